//! Products CSV export, one row per deduplicated product.

use std::path::Path;

use aisle_core::Product;

/// Column order of the export. Kept stable so spreadsheets and downstream
/// scripts can rely on positions.
const HEADER: [&str; 15] = [
    "id",
    "name",
    "description",
    "price_minor",
    "original_price_minor",
    "discount_percent",
    "provenance",
    "category_name",
    "category_slug",
    "stock_quantity",
    "available",
    "in_stock",
    "image_url",
    "unit_info",
    "barcode",
];

/// Write `products` to `path` as CSV, header first.
///
/// Absent optional fields become empty cells rather than `0` or `null`, so a
/// missing price stays distinguishable from a free item.
pub(crate) fn write_products_csv(path: &Path, products: &[Product]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    for product in products {
        writer.write_record([
            product.id.as_str(),
            product.name.as_str(),
            product.description.as_str(),
            product
                .price_minor
                .map(|v| v.to_string())
                .unwrap_or_default()
                .as_str(),
            product
                .original_price_minor
                .map(|v| v.to_string())
                .unwrap_or_default()
                .as_str(),
            product
                .discount_percent()
                .map(|v| format!("{v:.1}"))
                .unwrap_or_default()
                .as_str(),
            product.provenance.label().as_str(),
            product.provenance.category_name().unwrap_or(""),
            product.provenance.category_slug().unwrap_or(""),
            product
                .stock_quantity
                .map(|v| v.to_string())
                .unwrap_or_default()
                .as_str(),
            if product.available { "true" } else { "false" },
            if product.in_stock { "true" } else { "false" },
            product.image_url.as_deref().unwrap_or(""),
            product.unit_info.as_deref().unwrap_or(""),
            product.barcode.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
