//! Normalization of raw item records into [`Product`]s.
//!
//! Item payloads have drifted across API revisions, so extraction is
//! tolerant: every field falls back through the key variants observed in
//! live responses and defaults instead of failing. Price handling:
//! `baseprice_cents` and `original_price_cents`/`original_price` are minor
//! units as-is; bare `baseprice`/`price` values are major units and are
//! converted. The untouched record is retained on the product for anything
//! not normalized here.

use serde_json::Value;

use aisle_core::{Product, Provenance};

/// Pulls the identity key out of a raw item record.
///
/// Accepts a non-empty string or a number (canonicalized to its decimal
/// string form, so `42` and `"42"` dedup to the same key). Anything else
/// means the record cannot be stored.
pub(crate) fn extract_item_id(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Builds a [`Product`] from a raw item record.
///
/// `id` must already have been extracted via [`extract_item_id`]; every
/// other field is optional in the source and defaults here.
#[must_use]
pub fn normalize_item(id: String, raw: &Value, provenance: Provenance) -> Product {
    let purchasable_balance = raw.get("purchasable_balance").and_then(Value::as_i64);

    Product {
        id,
        name: string_field(raw, "name"),
        description: string_field(raw, "description"),
        price_minor: extract_price_minor(raw),
        original_price_minor: extract_original_price_minor(raw),
        provenance,
        stock_quantity: purchasable_balance,
        available: raw.get("available").and_then(Value::as_bool).unwrap_or(true),
        in_stock: extract_in_stock(raw, purchasable_balance),
        image_url: extract_image_url(raw),
        unit_info: extract_unit_info(raw),
        barcode: optional_string(raw, "barcode_gtin").or_else(|| optional_string(raw, "barcode")),
        raw: raw.clone(),
    }
}

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn optional_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `baseprice_cents` is authoritative when present; `baseprice` and then
/// `price` are major-unit fallbacks.
fn extract_price_minor(raw: &Value) -> Option<i64> {
    if let Some(cents) = raw.get("baseprice_cents").and_then(Value::as_i64) {
        return Some(cents);
    }
    raw.get("baseprice")
        .or_else(|| raw.get("price"))
        .and_then(Value::as_f64)
        .map(to_minor_units)
}

/// Both observed keys carry minor units already.
fn extract_original_price_minor(raw: &Value) -> Option<i64> {
    raw.get("original_price_cents")
        .or_else(|| raw.get("original_price"))
        .and_then(Value::as_i64)
}

#[allow(clippy::cast_possible_truncation)] // catalog prices fit i64 minor units with room to spare
fn to_minor_units(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

/// An explicit `in_stock` flag wins; otherwise a stated stock balance
/// decides; otherwise optimistic.
fn extract_in_stock(raw: &Value, purchasable_balance: Option<i64>) -> bool {
    if let Some(flag) = raw.get("in_stock").and_then(Value::as_bool) {
        return flag;
    }
    match purchasable_balance {
        Some(balance) => balance > 0,
        None => true,
    }
}

/// `image` has been observed as both an object with a `url` and a bare
/// string; newer payloads use an `images` array instead.
fn extract_image_url(raw: &Value) -> Option<String> {
    raw.get("image")
        .and_then(|image| match image {
            Value::String(url) => Some(url.clone()),
            Value::Object(_) => image.get("url").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .or_else(|| {
            raw.get("images")
                .and_then(Value::as_array)
                .and_then(|images| images.first())
                .and_then(|image| image.get("url"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|url| !url.is_empty())
}

fn extract_unit_info(raw: &Value) -> Option<String> {
    optional_string(raw, "unit").or_else(|| {
        raw.get("sell_by_weight_config")
            .and_then(|config| config.get("unit"))
            .and_then(Value::as_str)
            .filter(|unit| !unit.is_empty())
            .map(str::to_owned)
    })
}
