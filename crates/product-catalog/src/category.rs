//! Category hierarchy built from slash-delimited category paths

use crate::product::Product;
use serde::{Deserialize, Serialize};

/// A category and its subcategories.
///
/// `items` records one entry per inserted path that ended at this node; the
/// entry is the node's own name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    pub children: Vec<CategoryNode>,
    pub items: Vec<String>,
}

impl CategoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&CategoryNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Fold category paths such as `Tools/Handheld/Hammer` into a forest where
/// shared prefixes share nodes. Siblings keep first-seen order.
///
/// Callers should drop blank paths first: an empty path yields a node with an
/// empty name.
pub fn build_category_tree<S: AsRef<str>>(paths: &[S]) -> Vec<CategoryNode> {
    let mut roots = Vec::new();
    for path in paths {
        insert_path(&mut roots, path.as_ref());
    }
    roots
}

fn insert_path(roots: &mut Vec<CategoryNode>, path: &str) {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut level = roots;

    for (depth, segment) in segments.into_iter().enumerate() {
        // Linear scan; sibling lists are short
        let index = match level.iter().position(|node| node.name == segment) {
            Some(index) => index,
            None => {
                level.push(CategoryNode::new(segment));
                level.len() - 1
            }
        };

        let node = &mut level[index];
        if depth == last {
            node.items.push(segment.to_string());
        }
        level = &mut node.children;
    }
}

/// Non-blank category paths of `products`, in product order
pub fn category_paths<'a, I>(products: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .map(Product::category_path)
        .filter(|path| !path.trim().is_empty())
        .collect()
}
