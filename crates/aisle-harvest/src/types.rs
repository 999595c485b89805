//! Consumer assortment API response types.
//!
//! ## Observed shape from the live consumer-assortment endpoints
//!
//! ### Category tree
//! `GET …/venues/slug/{venue}/assortment` returns `{"categories": [...]}`
//! where each entry nests its children under `subcategories`, recursively.
//! Any string field may be absent or empty on sparse nodes (a node with
//! subcategories but no `name` has been observed), so every field defaults
//! rather than failing the whole tree.
//!
//! ### `images`
//! An array of `{"url": ...}` objects. Usually zero or one entry; only the
//! first is used.
//!
//! ### Item listings
//! `GET …/assortment/categories/slug/{slug}` and the item-search POST both
//! return `{"items": [...]}`. Item records have shifted shape across API
//! revisions (`baseprice_cents` vs `price`, `image` vs `images`,
//! `barcode` vs `barcode_gtin`), so items are kept as raw
//! `serde_json::Value`s here and field extraction is done tolerantly in
//! `normalize.rs`. A category with no addressable listing answers 404, not
//! an empty list.

use serde::Deserialize;

/// Top-level response from the venue assortment endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AssortmentResponse {
    /// Root categories of the tree. Empty array for an empty venue.
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
}

/// One node of the category tree as the API returns it, children nested.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNode {
    #[serde(default)]
    pub id: String,

    /// Display name. May be empty on structural nodes.
    #[serde(default)]
    pub name: String,

    /// URL-safe identifier used to fetch the node's item listing.
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// Zero or more images; only the first URL is kept downstream.
    #[serde(default)]
    pub images: Vec<CategoryImage>,

    #[serde(default)]
    pub subcategories: Vec<CategoryNode>,
}

/// An image reference on a category node.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryImage {
    #[serde(default)]
    pub url: String,
}

/// Items payload shared by category listings and item search.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsEnvelope {
    /// Raw item records, untyped on purpose; see the module docs.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}
