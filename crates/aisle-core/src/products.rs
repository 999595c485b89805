use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What caused a product's first insertion into the store. Later sightings of
/// the same identity key never change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// First returned by a category item listing.
    Category { id: String, name: String, slug: String },
    /// First returned by a discovery-sweep search query.
    Search { query: String },
    /// Extracted from a captured response body on disk.
    Capture { origin: String },
}

impl Provenance {
    /// The slug of the originating category, if this product came from one.
    #[must_use]
    pub fn category_slug(&self) -> Option<&str> {
        match self {
            Provenance::Category { slug, .. } => Some(slug),
            _ => None,
        }
    }

    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        match self {
            Provenance::Category { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Compact single-string form for logs and CSV rows,
    /// e.g. `"category:juices"` or `"search:a"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Provenance::Category { slug, .. } => format!("category:{slug}"),
            Provenance::Search { query } => format!("search:{query}"),
            Provenance::Capture { origin } => format!("capture:{origin}"),
        }
    }
}

/// A catalog item normalized from a raw upstream record.
///
/// Prices are integer minor-currency units end to end; an absent price stays
/// `None` rather than being coerced to zero, so aggregate statistics can skip
/// unknown prices instead of averaging them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Upstream identifier canonicalized to a string; the deduplication key.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in minor units; `None` when the source gave no usable price.
    pub price_minor: Option<i64>,
    /// Pre-discount price in minor units, present only for discounted items.
    pub original_price_minor: Option<i64>,
    pub provenance: Provenance,
    /// Stock count as stated by the source; `None` when it stated none.
    /// Availability checks treat `None` as zero, but the distinction from an
    /// explicit zero survives into the persisted datasets.
    pub stock_quantity: Option<i64>,
    pub available: bool,
    pub in_stock: bool,
    pub image_url: Option<String>,
    pub unit_info: Option<String>,
    pub barcode: Option<String>,
    /// The untouched upstream record, kept for fields not yet normalized.
    pub raw: Value,
}

impl Product {
    /// Percentage discount implied by the two prices, present only when both
    /// are known and the original is strictly higher.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // prices sit far below 2^52, the cast is exact
    pub fn discount_percent(&self) -> Option<f64> {
        match (self.price_minor, self.original_price_minor) {
            (Some(price), Some(original)) if original > price => {
                Some((original - price) as f64 / original as f64 * 100.0)
            }
            _ => None,
        }
    }

    /// Stock count with an absent quantity treated as zero.
    #[must_use]
    pub fn effective_stock(&self) -> i64 {
        self.stock_quantity.unwrap_or(0)
    }

    /// True when the source flags the item as both available and in stock.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.available && self.in_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(price_minor: Option<i64>, original_price_minor: Option<i64>) -> Product {
        Product {
            id: "64e73f5cc0d46fdeedfb1ab7".to_string(),
            name: "Orange Juice 1L".to_string(),
            description: "Freshly squeezed".to_string(),
            price_minor,
            original_price_minor,
            provenance: Provenance::Category {
                id: "c-juices".to_string(),
                name: "Juices".to_string(),
                slug: "juices".to_string(),
            },
            stock_quantity: Some(12),
            available: true,
            in_stock: true,
            image_url: None,
            unit_info: Some("1 l".to_string()),
            barcode: None,
            raw: serde_json::json!({"id": "64e73f5cc0d46fdeedfb1ab7"}),
        }
    }

    #[test]
    fn discount_percent_computed_from_both_prices() {
        let product = make_product(Some(450), Some(600));
        let discount = product.discount_percent().expect("expected a discount");
        assert!((discount - 25.0).abs() < 1e-9, "got {discount}");
    }

    #[test]
    fn discount_percent_none_without_original_price() {
        let product = make_product(Some(450), None);
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn discount_percent_none_when_original_equals_price() {
        let product = make_product(Some(600), Some(600));
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn discount_percent_none_when_original_below_price() {
        let product = make_product(Some(600), Some(450));
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn discount_percent_none_without_any_price() {
        let product = make_product(None, Some(600));
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn effective_stock_defaults_absent_to_zero() {
        let mut product = make_product(Some(100), None);
        product.stock_quantity = None;
        assert_eq!(product.effective_stock(), 0);
        product.stock_quantity = Some(7);
        assert_eq!(product.effective_stock(), 7);
    }

    #[test]
    fn is_purchasable_requires_both_flags() {
        let mut product = make_product(Some(100), None);
        assert!(product.is_purchasable());
        product.in_stock = false;
        assert!(!product.is_purchasable());
        product.in_stock = true;
        product.available = false;
        assert!(!product.is_purchasable());
    }

    #[test]
    fn provenance_category_slug_only_for_category_kind() {
        let category = Provenance::Category {
            id: "c1".to_string(),
            name: "Juices".to_string(),
            slug: "juices".to_string(),
        };
        assert_eq!(category.category_slug(), Some("juices"));

        let search = Provenance::Search {
            query: "a".to_string(),
        };
        assert_eq!(search.category_slug(), None);
    }

    #[test]
    fn provenance_label_forms() {
        assert_eq!(
            Provenance::Search {
                query: "a".to_string()
            }
            .label(),
            "search:a"
        );
        assert_eq!(
            Provenance::Capture {
                origin: "captured.json".to_string()
            }
            .label(),
            "capture:captured.json"
        );
    }

    #[test]
    fn serde_roundtrip_product() {
        let product = make_product(Some(450), Some(600));
        let json = serde_json::to_string(&product).expect("serialization failed");
        let decoded: Product = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded.id, product.id);
        assert_eq!(decoded.price_minor, Some(450));
        assert_eq!(decoded.provenance, product.provenance);
    }

    #[test]
    fn provenance_serializes_tagged() {
        let json = serde_json::to_value(Provenance::Search {
            query: "b".to_string(),
        })
        .expect("serialization failed");
        assert_eq!(json["kind"], "search");
        assert_eq!(json["query"], "b");
    }
}
