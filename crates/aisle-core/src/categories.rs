use serde::{Deserialize, Serialize};

/// One node of an assortment tree after flattening, with its position in the
/// hierarchy made explicit so downstream code never needs the tree again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque upstream identifier.
    pub id: String,
    pub name: String,
    /// URL-safe identifier used to address the category's item listing.
    pub slug: String,
    pub description: String,
    /// Slash-joined ancestor names, root to self, e.g. `"Drinks/Juices"`.
    pub path: String,
    /// Depth from root; root categories are level 0.
    pub level: usize,
    /// `path` of the immediate ancestor; empty for root categories.
    pub parent_path: String,
    pub image_url: Option<String>,
    /// True if the source declared subcategories under this node.
    pub has_children: bool,
}

impl Category {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_category(path: &str, level: usize, parent_path: &str) -> Category {
        Category {
            id: "c1".to_string(),
            name: "Juices".to_string(),
            slug: "juices".to_string(),
            description: String::new(),
            path: path.to_string(),
            level,
            parent_path: parent_path.to_string(),
            image_url: None,
            has_children: false,
        }
    }

    #[test]
    fn is_root_true_at_level_zero() {
        assert!(make_category("Juices", 0, "").is_root());
    }

    #[test]
    fn is_root_false_below_root() {
        assert!(!make_category("Drinks/Juices", 1, "Drinks").is_root());
    }

    #[test]
    fn serde_roundtrip_category() {
        let category = make_category("Drinks/Juices", 1, "Drinks");
        let json = serde_json::to_string(&category).expect("serialization failed");
        let decoded: Category = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, category);
    }
}
