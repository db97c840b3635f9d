//! Flat and tree forms of a stored item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `type` value that marks the single top-level item.
pub const ROOT_MARKER: &str = "nodeRoot";

/// Deepest level the tree view holds; the root sits at level 0.
///
/// Each level adds an object and a `children` array to the JSON tree, so 60
/// levels keep [`read`](crate::ItemStore::read) output inside serde_json's
/// default nesting limit of 128.
pub const MAX_DEPTH: usize = 60;

/// One record of the flat, authoritative item list.
///
/// Keys the struct does not know about are kept in [`Item::extra`] and written
/// back unchanged, so variant schemas round-trip without loss. The optional
/// keys (`name`, `type`, `modelType`, `parentType`) are stored as
/// `Option<Option<String>>`: the outer `None` means the key was absent and is
/// not written, `Some(None)` means it was an explicit `null` and is written
/// back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "uuid", alias = "id")]
    pub id: String,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(rename = "type", default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Option<String>>,
    #[serde(rename = "modelType", default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub model_type: Option<Option<String>>,
    #[serde(rename = "parent", alias = "parentId", default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "parentType", default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keeps "absent" and "null" apart for optional string keys.
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

impl Item {
    /// Creates a plain item with no tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: Some(Some(name.into())),
            item_type: None,
            model_type: None,
            parent_id: parent_id.map(str::to_string),
            order,
            parent_type: None,
            extra: Map::new(),
        }
    }

    /// Creates an item carrying the root marker.
    pub fn root(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_type: Some(Some(ROOT_MARKER.to_string())),
            ..Self::new(id, name, None, 0)
        }
    }

    pub fn is_root(&self) -> bool {
        self.item_type() == Some(ROOT_MARKER)
    }

    /// Display label; empty when the record has none.
    pub fn name(&self) -> &str {
        self.name.as_ref().and_then(Option::as_deref).unwrap_or("")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(Some(name.into()));
    }

    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_ref().and_then(Option::as_deref)
    }

    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_ref().and_then(Option::as_deref)
    }

    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_ref().and_then(Option::as_deref)
    }

    /// `true` if the record carries a `parentType` key, even a `null` one.
    pub fn has_parent_type(&self) -> bool {
        self.parent_type.is_some()
    }

    pub fn set_parent_type(&mut self, parent_type: Option<String>) {
        self.parent_type = Some(parent_type);
    }
}

/// An item with its children attached; the API-facing hierarchical view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default)]
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    pub fn leaf(item: Item) -> Self {
        Self { item, children: Vec::new() }
    }

    pub fn with_children(item: Item, children: Vec<TreeItem>) -> Self {
        Self { item, children }
    }

    /// Number of items in this subtree, including `self`.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels below `self`; 0 for a leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Always `false`: a subtree contains at least its own item.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds the subtree whose item has `id`, searching depth-first.
    pub fn find(&self, id: &str) -> Option<&TreeItem> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.item.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Sorts children ascending by `order` at every level, keeping ties in place.
    pub fn sort_children(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.children.sort_by_key(|child| child.item.order);
            stack.extend(node.children.iter_mut());
        }
    }
}
