//! Flat list → tree reconstruction.

use std::collections::HashMap;

use crate::core::item::{Item, TreeItem, MAX_DEPTH};

/// Rebuilds the tree view from a flat item list.
///
/// The item carrying the root marker becomes the root; every other item is
/// attached under the item its `parent_id` names, and each sibling group is
/// sorted ascending by `order` with ties kept in input order.
///
/// Lossy by design of the stored format:
///
/// - items whose parent is not in the list (orphans) are left out, together
///   with everything below them;
/// - items caught in a parent cycle are unreachable from the root and left out;
/// - when several items carry the root marker the first one wins and the
///   others are left out;
/// - for a repeated id only the first record is used;
/// - items more than [`MAX_DEPTH`] levels below the root are left out.
///
/// Returns `None` if no item carries the root marker.
pub fn build_tree(items: &[Item]) -> Option<TreeItem> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        if index.contains_key(item.id.as_str()) {
            log::warn!("Ignoring repeated record for item '{}'", item.id);
            continue;
        }
        index.insert(item.id.as_str(), pos);
    }

    let mut root = None;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    for (pos, item) in items.iter().enumerate() {
        if index.get(item.id.as_str()) != Some(&pos) {
            continue;
        }
        if item.is_root() {
            match root {
                None => root = Some(pos),
                Some(first) => log::warn!(
                    "Item '{}' is also marked as root; keeping '{}'",
                    item.id,
                    items[first].id
                ),
            }
            continue;
        }
        match item.parent_id.as_deref().and_then(|p| index.get(p)) {
            Some(&parent) => children[parent].push(pos),
            None => log::debug!(
                "Item '{}' has no resolvable parent ({:?}); left out of tree",
                item.id,
                item.parent_id
            ),
        }
    }

    for group in &mut children {
        // `sort_by_key` is stable: equal orders keep input order.
        group.sort_by_key(|&pos| items[pos].order);
    }

    root.map(|pos| assemble(items, &children, pos, 0))
}

// Each position appears in at most one child group and the root in none,
// so the walk from the root cannot revisit a node. Recursion stops at
// MAX_DEPTH.
fn assemble(items: &[Item], children: &[Vec<usize>], pos: usize, depth: usize) -> TreeItem {
    if depth == MAX_DEPTH {
        if !children[pos].is_empty() {
            log::warn!(
                "Items below '{}' exceed the depth limit of {}; left out of tree",
                items[pos].id,
                MAX_DEPTH
            );
        }
        return TreeItem::leaf(items[pos].clone());
    }
    TreeItem::with_children(
        items[pos].clone(),
        children[pos]
            .iter()
            .map(|&child| assemble(items, children, child, depth + 1))
            .collect(),
    )
}
