//! Default data used when the blob store is empty or on reset.

use crate::core::flatten::flatten;
use crate::core::item::{Item, TreeItem};
use crate::Result;

const SEED_TREE: &str = include_str!("seed.json");

/// The bundled default tree.
///
/// # Errors
///
/// Returns [`crate::TreeListError::Decode`] if the bundled JSON is malformed.
pub fn seed_tree() -> Result<TreeItem> {
    Ok(serde_json::from_str(SEED_TREE)?)
}

/// The bundled default tree as a flat list, in pre-order.
pub fn seed_items() -> Result<Vec<Item>> {
    Ok(flatten(&seed_tree()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::build_tree;

    #[test]
    fn test_seed_items_pre_order() {
        let ids: Vec<String> = seed_items().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["AAAA", "ABAA", "ABBA", "ABCA", "ACAA", "ACBA", "ADAA"]);
    }

    #[test]
    fn test_seed_has_single_root() {
        let items = seed_items().unwrap();
        let roots: Vec<&Item> = items.iter().filter(|i| i.is_root()).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].parent_id, None);
        assert_eq!(roots[0].model_type(), Some("Aaaa"));
    }

    #[test]
    fn test_seed_rebuilds_to_same_tree() {
        let tree = seed_tree().unwrap();
        assert_eq!(build_tree(&seed_items().unwrap()), Some(tree));
    }
}
