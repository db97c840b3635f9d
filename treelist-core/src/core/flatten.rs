//! Tree → flat list conversion.

use std::collections::HashSet;

use crate::core::item::{Item, TreeItem};

/// Flattens `root` into a list of items in pre-order (each item before its
/// descendants, descendants in their given child order).
///
/// Every field except `children` is copied unchanged. A subtree whose id has
/// already been emitted is skipped, so a tree with repeated ids never yields
/// duplicate records. The walk keeps its own stack, so nesting depth is not
/// limited by the thread stack.
pub fn flatten(root: &TreeItem) -> Vec<Item> {
    let mut out = Vec::with_capacity(root.len());
    let mut visited = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visited.insert(node.item.id.as_str()) {
            log::warn!("Skipping repeated item '{}' while flattening", node.item.id);
            continue;
        }
        out.push(node.item.clone());
        // Reversed so the first child is popped next.
        stack.extend(node.children.iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeItem {
        TreeItem::with_children(
            Item::root("R", "Root"),
            vec![
                TreeItem::with_children(
                    Item::new("A", "a", Some("R"), 0),
                    vec![TreeItem::leaf(Item::new("A1", "a1", Some("A"), 0))],
                ),
                TreeItem::leaf(Item::new("B", "b", Some("R"), 1)),
            ],
        )
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let ids: Vec<String> = flatten(&sample()).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["R", "A", "A1", "B"]);
    }

    #[test]
    fn test_flatten_keeps_given_child_order() {
        // Child order is taken as given, not re-sorted by `order`.
        let tree = TreeItem::with_children(
            Item::root("R", "Root"),
            vec![
                TreeItem::leaf(Item::new("late", "", Some("R"), 9)),
                TreeItem::leaf(Item::new("early", "", Some("R"), 1)),
            ],
        );
        let ids: Vec<String> = flatten(&tree).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["R", "late", "early"]);
    }

    #[test]
    fn test_flatten_keeps_scalar_fields() {
        let mut tree = sample();
        tree.item.model_type = Some(Some("Aaaa".to_string()));
        tree.children[1].item.extra.insert("color".into(), "blue".into());

        let items = flatten(&tree);
        assert_eq!(items[0].model_type(), Some("Aaaa"));
        assert!(items[0].is_root());
        assert_eq!(items[3].extra["color"], "blue");
        assert_eq!(items[2].parent_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_flatten_skips_repeated_ids() {
        let tree = TreeItem::with_children(
            Item::root("R", "Root"),
            vec![
                TreeItem::with_children(
                    Item::new("A", "first", Some("R"), 0),
                    vec![TreeItem::leaf(Item::new("A1", "", Some("A"), 0))],
                ),
                TreeItem::with_children(
                    Item::new("A", "second", Some("R"), 1),
                    vec![TreeItem::leaf(Item::new("A2", "", Some("A"), 0))],
                ),
            ],
        );
        let items = flatten(&tree);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["R", "A", "A1"]);
        assert_eq!(items[1].name(), "first");
    }

    #[test]
    fn test_flatten_deep_chain() {
        let mut tree = TreeItem::leaf(Item::new("n3000", "", Some("n2999"), 0));
        for i in (1..3000).rev() {
            let parent = format!("n{}", i - 1);
            tree = TreeItem::with_children(Item::new(format!("n{i}"), "", Some(parent.as_str()), 0), vec![tree]);
        }
        let items = flatten(&tree);
        assert_eq!(items.len(), 3000);
        assert_eq!(items[0].id, "n1");
        assert_eq!(items[2999].id, "n3000");
        let mut stack = vec![tree];
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
