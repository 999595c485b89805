//! Sifting product records out of captured response bodies.
//!
//! Captured traffic (proxy dumps, saved responses) contains item payloads
//! under unpredictable nesting. This walks any JSON document for `items`
//! arrays whose entries look like product records and pulls the raw
//! records out, deduplicated by identity key, in document order.

use std::collections::HashSet;

use serde_json::Value;

use crate::normalize::extract_item_id;

/// Keys whose presence on an array's first entry marks it as product-like.
const PRODUCT_HINT_KEYS: [&str; 5] = ["name", "price", "baseprice", "id", "description"];

/// Nesting deeper than this is not searched.
const MAX_SIFT_DEPTH: usize = 10;

/// Extracts raw product records from an arbitrary JSON document.
///
/// A record qualifies when it sits in an `items` array that looks
/// product-like and carries a usable identity key. The first record seen
/// for a key wins, matching store semantics, so feeding the result into a
/// [`crate::store::ProductStore`] adds nothing twice.
#[must_use]
pub fn extract_product_candidates(value: &Value) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    walk(value, 0, &mut seen, &mut found);
    found
}

fn walk(value: &Value, depth: usize, seen: &mut HashSet<String>, found: &mut Vec<Value>) {
    if depth > MAX_SIFT_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("items") {
                if looks_like_product_list(items) {
                    for item in items {
                        let Some(id) = extract_item_id(item) else {
                            continue;
                        };
                        if seen.insert(id) {
                            found.push(item.clone());
                        }
                    }
                }
            }
            for child in map.values() {
                walk(child, depth + 1, seen, found);
            }
        }
        Value::Array(array) => {
            for entry in array {
                walk(entry, depth + 1, seen, found);
            }
        }
        _ => {}
    }
}

fn looks_like_product_list(items: &[Value]) -> bool {
    items.first().is_some_and(|first| {
        first
            .as_object()
            .is_some_and(|object| PRODUCT_HINT_KEYS.iter().any(|key| object.contains_key(*key)))
    })
}
