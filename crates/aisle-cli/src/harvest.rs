//! Harvest command handlers for the CLI.
//!
//! Called from `main` after configuration is loaded. Per-venue failures are
//! logged and skipped rather than propagated, so one unreachable venue does
//! not abort the whole run; the command fails only when every venue failed.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use aisle_core::{AppConfig, CategoryStat, HarvestOptions, HarvestReport, VenueConfig};
use aisle_harvest::{
    AssortmentClient, CategoriesDataset, DatasetSink, Harvester, HttpTransport, ProductsDataset,
    CATEGORIES_DATASET, PRODUCTS_DATASET,
};

use crate::csv_export;
use crate::sink::JsonDirSink;

/// Load the venues to process for a harvest run.
///
/// With `venue_filter` set, that venue is selected whether or not it is
/// enabled, and an unknown slug is an error. Without it, all enabled venues
/// are returned in file order.
pub(crate) fn load_venues_for_harvest(
    config: &AppConfig,
    venue_filter: Option<&str>,
) -> anyhow::Result<Vec<VenueConfig>> {
    let venues_file = aisle_core::load_venues(&config.venues_path)?;

    let venues = match venue_filter {
        Some(slug) => {
            let venue = venues_file
                .venues
                .iter()
                .find(|v| v.slug == slug)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "venue '{slug}' not found in {}",
                        config.venues_path.display()
                    )
                })?;
            vec![venue]
        }
        None => venues_file.enabled_venues().into_iter().cloned().collect(),
    };

    if venues.is_empty() {
        anyhow::bail!("no enabled venues in {}", config.venues_path.display());
    }

    Ok(venues)
}

fn build_harvester(
    config: &AppConfig,
    options: HarvestOptions,
    cancel: CancellationToken,
) -> anyhow::Result<Harvester<HttpTransport>> {
    let transport = HttpTransport::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build HTTP transport: {e}"))?;
    let client = AssortmentClient::new(
        transport,
        options.venue_slug.clone(),
        options.language.clone(),
        options.page_cap,
        config.max_retries,
        config.retry_backoff_base_secs,
    );
    Ok(Harvester::new(client, options, cancel))
}

/// Harvest every selected venue end to end, writing the three JSON datasets
/// and a products CSV under `{output_dir}/{venue}/`.
///
/// When `dry_run` is `true` the function prints what would be harvested and
/// returns without issuing any requests.
///
/// # Errors
///
/// Returns an error if the venue roster cannot be loaded, the filter matches
/// nothing, or every selected venue fails. Per-venue harvest failures are
/// logged and skipped, not propagated.
pub(crate) async fn run_harvest(
    config: &AppConfig,
    venue_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let venues = load_venues_for_harvest(config, venue_filter)?;

    if dry_run {
        let slugs: Vec<&str> = venues.iter().map(|v| v.slug.as_str()).collect();
        println!(
            "dry-run: would harvest {} venues: [{}]",
            venues.len(),
            slugs.join(", ")
        );
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current step");
            interrupt.cancel();
        }
    });

    let mut total_products: usize = 0;
    let mut failed_venues: usize = 0;
    let venue_count = venues.len();

    for venue in &venues {
        let options = HarvestOptions::for_venue(config, venue);
        let venue_dir = config.output_dir.join(&venue.slug);

        let report = match harvest_one(config, options, cancel.clone(), &venue_dir).await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("error: harvest failed for {}: {e}", venue.slug);
                failed_venues += 1;
                if cancel.is_cancelled() {
                    break;
                }
                continue;
            }
        };

        total_products += report.unique_products;
        if report.cancelled {
            break;
        }
    }

    if failed_venues > 0 {
        tracing::warn!(
            failed_venues,
            total_venues = venue_count,
            "some venues failed during harvest"
        );
    }
    if failed_venues == venue_count {
        anyhow::bail!("all {failed_venues} venues failed");
    }

    println!("harvested {total_products} unique products across {venue_count} venues");
    Ok(())
}

async fn harvest_one(
    config: &AppConfig,
    options: HarvestOptions,
    cancel: CancellationToken,
    venue_dir: &Path,
) -> anyhow::Result<HarvestReport> {
    let harvester = build_harvester(config, options, cancel)?;
    let sink = JsonDirSink::new(venue_dir.to_path_buf());
    let report = harvester.run(&sink).await?;

    // The sink has just written the datasets; read the products back for
    // the CSV export and the categories back for the per-category summary.
    let products_path = venue_dir.join(format!("{PRODUCTS_DATASET}.json"));
    let raw = std::fs::read_to_string(&products_path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", products_path.display()))?;
    let products: ProductsDataset = serde_json::from_str(&raw)?;

    csv_export::write_products_csv(&venue_dir.join("products.csv"), &products.products)?;

    let categories_path = venue_dir.join(format!("{CATEGORIES_DATASET}.json"));
    let raw = std::fs::read_to_string(&categories_path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", categories_path.display()))?;
    let categories: CategoriesDataset = serde_json::from_str(&raw)?;

    print_summary(&report, &categories.category_stats);
    Ok(report)
}

fn print_summary(report: &HarvestReport, category_stats: &[CategoryStat]) {
    println!(
        "{}: {} unique products from {} of {} categories ({} found only by sweep)",
        report.venue,
        report.unique_products,
        report.productive_categories,
        report.total_categories,
        report.sweep_new_items
    );
    if report.cancelled {
        println!("  run cancelled early; datasets hold the partial harvest");
    }
    if !report.failed_categories.is_empty() {
        println!(
            "  {} categories failed to fetch",
            report.failed_categories.len()
        );
    }
    if report.is_suspect() {
        println!(
            "  verdict suspect: {} categories hit the page cap",
            report.flagged_categories.len()
        );
    }

    let mut ranked: Vec<&CategoryStat> = category_stats
        .iter()
        .filter(|stat| stat.item_count > 0)
        .collect();
    ranked.sort_by(|a, b| b.item_count.cmp(&a.item_count));
    for stat in ranked.iter().take(5) {
        println!("  {:>5} items  {}", stat.item_count, stat.path);
    }
}

/// Fetch one venue's category tree, print it flattened, and persist the
/// categories dataset for inspection.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, the filter matches
/// nothing, or the assortment fetch fails.
pub(crate) async fn run_categories(
    config: &AppConfig,
    venue_filter: Option<&str>,
) -> anyhow::Result<()> {
    let venues = load_venues_for_harvest(config, venue_filter)?;
    let venue = venues
        .first()
        .ok_or_else(|| anyhow::anyhow!("no venue selected"))?;

    let options = HarvestOptions::for_venue(config, venue);
    let harvester = build_harvester(config, options.clone(), CancellationToken::new())?;
    let categories = harvester.fetch_category_tree().await?;

    let sink = JsonDirSink::new(config.output_dir.join(&venue.slug));
    sink.persist(
        CATEGORIES_DATASET,
        &serde_json::to_value(CategoriesDataset::new(
            &options,
            categories.clone(),
            Vec::new(),
        ))?,
    )
    .await?;

    for category in &categories {
        println!(
            "{}{} ({})",
            "  ".repeat(category.level),
            category.name,
            category.slug
        );
    }
    println!("{} categories for {}", categories.len(), options.venue_slug);
    Ok(())
}
