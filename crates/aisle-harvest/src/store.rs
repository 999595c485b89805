//! Identity-keyed accumulation of products across fetches.

use std::collections::HashMap;

use serde_json::Value;

use aisle_core::{Product, Provenance};

use crate::normalize::{extract_item_id, normalize_item};

/// Deduplicating product store.
///
/// The first record seen for an identity key wins: later sightings of the
/// same key, from any source, change nothing, so a product's stored fields
/// and provenance always describe its first discovery. Insertion order is
/// preserved so repeated harvests of the same catalog produce identically
/// ordered exports.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    skipped_unidentifiable: usize,
}

impl ProductStore {
    #[must_use]
    pub fn new() -> Self {
        ProductStore::default()
    }

    /// Merges a batch of raw item records, tagging new ones with
    /// `provenance`. Returns how many records were new to the store.
    ///
    /// Records without a usable identity key are counted and skipped; an
    /// unidentifiable record can never be deduplicated, so storing it would
    /// corrupt the unique count.
    pub fn merge(&mut self, items: &[Value], provenance: &Provenance) -> usize {
        let mut new_count = 0;
        for raw in items {
            let Some(id) = extract_item_id(raw) else {
                self.skipped_unidentifiable += 1;
                tracing::debug!(source = %provenance.label(), "skipping item without a usable id");
                continue;
            };
            if self.index.contains_key(&id) {
                continue;
            }
            let product = normalize_item(id.clone(), raw, provenance.clone());
            self.index.insert(id, self.products.len());
            self.products.push(product);
            new_count += 1;
        }
        new_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    /// Products in first-discovery order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// How many records were dropped for lacking an identity key.
    #[must_use]
    pub fn skipped_unidentifiable(&self) -> usize {
        self.skipped_unidentifiable
    }

    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}
