//! The `sift` subcommand: best-effort product extraction from a captured
//! response body, for payloads picked up outside a normal harvest.

use std::path::Path;

use aisle_core::{AppConfig, Provenance};
use aisle_harvest::{extract_product_candidates, ProductStore};

use crate::csv_export;

/// Sift product-shaped records out of a JSON file and export them.
///
/// Candidates are merged through the regular product store, so duplicates
/// collapse and records without an id are skipped. Output lands next to the
/// harvest datasets as `{output_dir}/{stem}_products.json` and `.csv`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an export
/// cannot be written.
pub(crate) async fn run_sift(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", file.display()))?;

    let candidates = extract_product_candidates(&value);
    if candidates.is_empty() {
        println!("no product-shaped records found in {}", file.display());
        return Ok(());
    }

    let origin = file
        .file_name()
        .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
    let provenance = Provenance::Capture { origin };

    let mut store = ProductStore::new();
    let merged = store.merge(&candidates, &provenance);
    let products = store.into_products();

    let stem = file
        .file_stem()
        .map_or_else(|| "capture".to_string(), |s| s.to_string_lossy().into_owned());
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let json_path = config.output_dir.join(format!("{stem}_products.json"));
    let csv_path = config.output_dir.join(format!("{stem}_products.csv"));

    let json = serde_json::to_vec_pretty(&products)?;
    tokio::fs::write(&json_path, json).await?;
    csv_export::write_products_csv(&csv_path, &products)?;

    println!("sifted {merged} products from {}", file.display());
    println!("  {}", json_path.display());
    println!("  {}", csv_path.display());
    Ok(())
}
