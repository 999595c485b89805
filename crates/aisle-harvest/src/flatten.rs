//! Flattening of the nested category tree into an ordered visit list.

use aisle_core::Category;

use crate::types::CategoryNode;

/// Flattens a category tree in pre-order: each parent before its children,
/// siblings in source order. Deterministic for a given tree.
///
/// Every declared node is emitted, including ones with an empty name or
/// slug; the walk must visit everything the source addressed, and skipping
/// sparse nodes here would silently shrink the harvest.
#[must_use]
pub fn flatten_categories(nodes: &[CategoryNode]) -> Vec<Category> {
    let mut flat = Vec::new();
    for node in nodes {
        push_subtree(node, "", 0, &mut flat);
    }
    flat
}

fn push_subtree(node: &CategoryNode, parent_path: &str, level: usize, flat: &mut Vec<Category>) {
    // An empty parent path collapses instead of producing a leading slash,
    // so children of nameless roots get clean paths.
    let path = if parent_path.is_empty() {
        node.name.clone()
    } else {
        format!("{parent_path}/{}", node.name)
    };

    flat.push(Category {
        id: node.id.clone(),
        name: node.name.clone(),
        slug: node.slug.clone(),
        description: node.description.clone(),
        path: path.clone(),
        level,
        parent_path: parent_path.to_owned(),
        image_url: node
            .images
            .first()
            .map(|image| image.url.clone())
            .filter(|url| !url.is_empty()),
        has_children: !node.subcategories.is_empty(),
    });

    for child in &node.subcategories {
        push_subtree(child, &path, level + 1, flat);
    }
}
