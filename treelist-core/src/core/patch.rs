//! Sparse reorder/reparent updates applied to the flat item list.
//!
//! A patch names an item by id and carries only the fields that change.
//! `null` and a missing key both mean "leave unchanged"; patches never create
//! items, and ids that match nothing are skipped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::item::{Item, MAX_DEPTH};
use crate::Result;

/// A partial update for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "uuid", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(rename = "parent", alias = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "parentType", default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
}

impl ItemPatch {
    pub fn reorder(id: impl Into<String>, order: i64) -> Self {
        Self { id: id.into(), order: Some(order), ..Self::default() }
    }

    pub fn reparent(id: impl Into<String>, parent_id: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            order: Some(order),
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }
}

/// Outcome of applying one batch of patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    /// Patches whose id matched an item and whose move, if any, was allowed.
    pub applied: usize,
    /// Ids that matched no item; those patches were skipped.
    pub ignored: Vec<String>,
    /// Ids whose parent change was refused because it would break the tree
    /// or nest items past [`MAX_DEPTH`]. None of the patch's fields were
    /// applied.
    pub rejected: Vec<String>,
}

impl PatchReport {
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty() && self.rejected.is_empty()
    }
}

/// Decodes a JSON array of patches. The whole batch decodes or none of it does.
///
/// # Errors
///
/// Returns [`crate::TreeListError::Decode`] if `text` is not a JSON array of
/// objects each carrying at least an id.
pub fn decode_patches(text: &str) -> Result<Vec<ItemPatch>> {
    Ok(serde_json::from_str(text)?)
}

/// Merges `patches` into `items` in place, in batch order.
///
/// Field rules:
///
/// - A patch whose move is refused is skipped as a whole and its id listed
///   in [`PatchReport::rejected`]. A move is refused if it would give the
///   root a parent, make an item its own parent, place it under one of its
///   own descendants, or put any item more than [`MAX_DEPTH`] levels below
///   the root. A parent id that matches no item is accepted and orphans the
///   item.
/// - `name` and `order` are written when present.
/// - `parentType` is a cache of the parent's `type`. When the item is moved
///   under a parent present in the list the cache is recomputed from that
///   parent (only for items that carry the cache or patches that supply it);
///   the payload value is used when the parent is not in the list or the
///   patch does not move the item.
pub fn apply_patches(items: &mut [Item], patches: &[ItemPatch]) -> PatchReport {
    let index: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .rev() // first record wins for a repeated id
        .map(|(pos, item)| (item.id.clone(), pos))
        .collect();

    let mut report = PatchReport::default();
    for patch in patches {
        let Some(&pos) = index.get(&patch.id) else {
            log::debug!("Patch for unknown item '{}' ignored", patch.id);
            report.ignored.push(patch.id.clone());
            continue;
        };
        if let Some(new_parent) = patch.parent_id.as_deref() {
            if let Err(reason) = check_reparent(items, &index, pos, new_parent) {
                log::warn!("Refusing to move '{}' under '{}': {}", patch.id, new_parent, reason);
                report.rejected.push(patch.id.clone());
                continue;
            }
        }
        report.applied += 1;

        if let Some(name) = &patch.name {
            items[pos].set_name(name.clone());
        }
        if let Some(order) = patch.order {
            items[pos].order = order;
        }

        let Some(new_parent) = patch.parent_id.as_deref() else {
            if let Some(parent_type) = &patch.parent_type {
                items[pos].set_parent_type(Some(parent_type.clone()));
            }
            continue;
        };

        let cached = match index.get(new_parent) {
            Some(&parent) => {
                let wants_cache = items[pos].has_parent_type() || patch.parent_type.is_some();
                wants_cache.then(|| items[parent].item_type().map(str::to_string))
            }
            None => {
                log::warn!("Item '{}' moved under unknown parent '{}'", patch.id, new_parent);
                patch.parent_type.clone().map(Some)
            }
        };
        let item = &mut items[pos];
        item.parent_id = Some(new_parent.to_string());
        if let Some(parent_type) = cached {
            item.set_parent_type(parent_type);
        }
    }
    report
}

/// Checks that putting `items[pos]` under `new_parent` keeps a single-rooted tree.
fn check_reparent(
    items: &[Item],
    index: &HashMap<String, usize>,
    pos: usize,
    new_parent: &str,
) -> std::result::Result<(), &'static str> {
    let id = items[pos].id.as_str();
    if items[pos].is_root() {
        return Err("the root item cannot have a parent");
    }
    if new_parent == id {
        return Err("an item cannot be its own parent");
    }

    // Walk the ancestor chain of the new parent. Bounded by the list length
    // so an existing cycle elsewhere cannot stall the walk.
    let mut current = new_parent;
    let mut parent_depth = 0;
    let mut reaches_root = false;
    for _ in 0..items.len() {
        if current == id {
            return Err("the move would create a cycle");
        }
        let Some(&ancestor) = index.get(current) else {
            break;
        };
        if items[ancestor].is_root() {
            reaches_root = true;
            break;
        }
        match items[ancestor].parent_id.as_deref() {
            Some(next) => {
                current = next;
                parent_depth += 1;
            }
            None => break,
        }
    }

    // Only a parent connected to the root puts the item in the tree view.
    if reaches_root && parent_depth + 1 + subtree_height(items, pos) > MAX_DEPTH {
        return Err("the move would nest items past the depth limit");
    }
    Ok(())
}

/// Levels below `items[pos]`, counted up to `MAX_DEPTH + 1`.
fn subtree_height(items: &[Item], pos: usize) -> usize {
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    for (child, item) in items.iter().enumerate() {
        if item.is_root() {
            continue;
        }
        if let Some(parent) = item.parent_id.as_deref() {
            children.entry(parent).or_default().push(child);
        }
    }

    let mut visited = HashSet::from([pos]);
    let mut level = vec![pos];
    let mut height = 0;
    while height <= MAX_DEPTH {
        let next: Vec<usize> = level
            .iter()
            .filter_map(|&p| children.get(items[p].id.as_str()))
            .flatten()
            .copied()
            .filter(|&child| visited.insert(child))
            .collect();
        if next.is_empty() {
            break;
        }
        height += 1;
        level = next;
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        let mut root = Item::root("R", "Root");
        root.model_type = Some(Some("Folder".to_string()));
        let mut a = Item::new("A", "a", Some("R"), 0);
        a.item_type = Some(Some("group".to_string()));
        vec![
            root,
            a,
            Item::new("A1", "a1", Some("A"), 0),
            Item::new("B", "b", Some("R"), 1),
        ]
    }

    #[test]
    fn test_decode_patches_with_nulls_and_aliases() {
        let patches =
            decode_patches(r#"[{"uuid":"A","order":5,"parent":null},{"id":"B","parentId":"A"}]"#)
                .unwrap();
        assert_eq!(patches[0].order, Some(5));
        assert_eq!(patches[0].parent_id, None);
        assert_eq!(patches[1].id, "B");
        assert_eq!(patches[1].parent_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_decode_patches_rejects_malformed_input() {
        assert!(decode_patches("not json").is_err());
        assert!(decode_patches(r#"{"uuid":"A"}"#).is_err());
        assert!(decode_patches(r#"[{"order":1}]"#).is_err());
        assert!(decode_patches(r#"[{"uuid":"A","order":"high"}]"#).is_err());
    }

    #[test]
    fn test_sparse_merge_changes_only_order() {
        let mut items = sample();
        let before = items.clone();
        let patches = decode_patches(r#"[{"uuid":"A1","order":5,"parent":null}]"#).unwrap();

        let report = apply_patches(&mut items, &patches);

        assert_eq!(report.applied, 1);
        assert!(report.is_clean());
        assert_eq!(items[2].order, 5);
        assert_eq!(items[2].parent_id.as_deref(), Some("A"));
        assert_eq!(items[2].name, before[2].name);
        assert_eq!(&items[..2], &before[..2]);
        assert_eq!(items[3], before[3]);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut items = sample();
        let before = items.clone();
        let report = apply_patches(&mut items, &[ItemPatch::reorder("nonexistent", 1)]);
        assert_eq!(items, before);
        assert_eq!(report.applied, 0);
        assert_eq!(report.ignored, ["nonexistent"]);
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut items = sample();
        let before = serde_json::to_string(&items).unwrap();
        let report = apply_patches(&mut items, &[]);
        assert_eq!(serde_json::to_string(&items).unwrap(), before);
        assert_eq!(report, PatchReport::default());
    }

    #[test]
    fn test_reparent_and_rename() {
        let mut items = sample();
        let patch = ItemPatch {
            name: Some("renamed".to_string()),
            ..ItemPatch::reparent("B", "A", 1)
        };
        apply_patches(&mut items, &[patch]);
        assert_eq!(items[3].parent_id.as_deref(), Some("A"));
        assert_eq!(items[3].order, 1);
        assert_eq!(items[3].name(), "renamed");
    }

    #[test]
    fn test_batch_applies_in_order() {
        let mut items = sample();
        let patches = vec![ItemPatch::reorder("B", 3), ItemPatch::reorder("B", 7)];
        let report = apply_patches(&mut items, &patches);
        assert_eq!(report.applied, 2);
        assert_eq!(items[3].order, 7);
    }

    #[test]
    fn test_unknown_entries_do_not_stop_batch() {
        let mut items = sample();
        let patches = vec![ItemPatch::reorder("ghost", 1), ItemPatch::reorder("A", 9)];
        let report = apply_patches(&mut items, &patches);
        assert_eq!(report.applied, 1);
        assert_eq!(items[1].order, 9);
    }

    #[test]
    fn test_move_under_own_descendant_is_rejected() {
        let mut items = sample();
        let report = apply_patches(&mut items, &[ItemPatch::reparent("A", "A1", 4)]);
        assert_eq!(report.rejected, ["A"]);
        assert_eq!(report.applied, 0);
        assert_eq!(items[1].parent_id.as_deref(), Some("R"));
        assert_eq!(items[1].order, 0);
    }

    #[test]
    fn test_rejected_move_skips_whole_patch() {
        let mut items = sample();
        let before = items.clone();
        let patch = ItemPatch { name: Some("renamed".to_string()), ..ItemPatch::reparent("A", "A1", 4) };
        let report = apply_patches(&mut items, &[patch, ItemPatch::reorder("B", 5)]);
        assert_eq!(report.rejected, ["A"]);
        assert_eq!(report.applied, 1);
        assert_eq!(items[1], before[1]);
        assert_eq!(items[3].order, 5);
    }

    /// `sample()` plus a chain `C1 .. Cn` under the root; `Cn` sits at level n.
    fn with_chain(len: usize) -> Vec<Item> {
        let mut items = sample();
        for i in 1..=len {
            let parent = if i == 1 { "R".to_string() } else { format!("C{}", i - 1) };
            items.push(Item::new(format!("C{i}"), "", Some(parent.as_str()), 0));
        }
        items
    }

    #[test]
    fn test_move_past_depth_limit_is_rejected() {
        let mut items = with_chain(MAX_DEPTH);
        let deepest = format!("C{MAX_DEPTH}");
        let report = apply_patches(&mut items, &[ItemPatch::reparent("B", deepest, 0)]);
        assert_eq!(report.rejected, ["B"]);
        assert_eq!(items[3].parent_id.as_deref(), Some("R"));
    }

    #[test]
    fn test_move_counts_height_of_moved_subtree() {
        let mut items = with_chain(MAX_DEPTH);
        let above_deepest = format!("C{}", MAX_DEPTH - 1);
        // A leaf fits at the last level; A and its child A1 do not.
        let patches = vec![
            ItemPatch::reparent("B", above_deepest.clone(), 0),
            ItemPatch::reparent("A", above_deepest, 1),
        ];
        let report = apply_patches(&mut items, &patches);
        assert_eq!(report.applied, 1);
        assert_eq!(report.rejected, ["A"]);
        assert_eq!(items[3].parent_id.as_deref(), Some(format!("C{}", MAX_DEPTH - 1).as_str()));
        assert_eq!(items[1].parent_id.as_deref(), Some("R"));
    }

    #[test]
    fn test_depth_limit_ignores_detached_parents() {
        let mut items = with_chain(MAX_DEPTH);
        items.push(Item::new("X", "", Some("missing"), 0));
        let report = apply_patches(&mut items, &[ItemPatch::reparent("A", "X", 0)]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_self_parent_and_root_move_are_rejected() {
        let mut items = sample();
        let patches = vec![ItemPatch::reparent("B", "B", 0), ItemPatch::reparent("R", "A", 0)];
        let report = apply_patches(&mut items, &patches);
        assert_eq!(report.rejected, ["B", "R"]);
        assert_eq!(items[0].parent_id, None);
        assert_eq!(items[3].parent_id.as_deref(), Some("R"));
    }

    #[test]
    fn test_move_to_unknown_parent_orphans_item() {
        let mut items = sample();
        let report = apply_patches(&mut items, &[ItemPatch::reparent("B", "missing", 0)]);
        assert!(report.is_clean());
        assert_eq!(items[3].parent_id.as_deref(), Some("missing"));
    }

    #[test]
    fn test_parent_type_recomputed_from_new_parent() {
        let mut items = sample();
        items[2].set_parent_type(Some("group".to_string()));
        let patch = ItemPatch {
            parent_type: Some("stale".to_string()),
            ..ItemPatch::reparent("A1", "R", 2)
        };
        apply_patches(&mut items, &[patch]);
        assert_eq!(items[2].parent_type(), Some("nodeRoot"));
    }

    #[test]
    fn test_parent_type_not_added_to_items_without_cache() {
        let mut items = sample();
        apply_patches(&mut items, &[ItemPatch::reparent("B", "A", 0)]);
        assert_eq!(items[3].parent_type, None);
    }

    #[test]
    fn test_parent_type_from_payload_when_parent_unknown() {
        let mut items = sample();
        let patch = ItemPatch {
            parent_type: Some("external".to_string()),
            ..ItemPatch::reparent("B", "elsewhere", 0)
        };
        apply_patches(&mut items, &[patch]);
        assert_eq!(items[3].parent_type(), Some("external"));
    }

    #[test]
    fn test_parent_type_alone_is_written() {
        let mut items = sample();
        let patch = ItemPatch { parent_type: Some("group".to_string()), ..ItemPatch::reorder("B", 1) };
        apply_patches(&mut items, &[patch]);
        assert_eq!(items[3].parent_type(), Some("group"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = PatchReport { applied: 1, ignored: vec!["x".into()], rejected: vec![] };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"applied":1,"ignored":["x"],"rejected":[]}"#);
    }
}
