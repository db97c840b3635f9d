//! The item store: owner of the authoritative flat list.

use crate::core::item::{Item, TreeItem};
use crate::core::patch::{apply_patches, decode_patches, ItemPatch, PatchReport};
use crate::core::seed::seed_items;
use crate::core::tree::build_tree;
use crate::{BlobStore, Result, TreeListError};

/// Blob-store key under which the flat list is persisted.
pub const ITEMS_KEY: &str = "tree-list-items";

/// Lifecycle of an [`ItemStore`].
#[derive(Debug, Clone, PartialEq)]
enum State {
    Uninitialized,
    Ready(Vec<Item>),
}

/// Owns the authoritative item list and keeps it in sync with a [`BlobStore`].
///
/// The list is loaded by [`initialize`](Self::initialize), rebuilt into a tree
/// on [`read`](Self::read), and changed only by [`write`](Self::write) and
/// [`reset`](Self::reset), both of which persist the whole list before they
/// return. Mutations take `&mut self`; a host that shares one store between
/// callers puts it behind a `Mutex`.
pub struct ItemStore<S: BlobStore> {
    blobs: S,
    state: State,
}

impl<S: BlobStore> ItemStore<S> {
    /// Wraps `blobs` without touching it. Call [`initialize`](Self::initialize) next.
    pub fn new(blobs: S) -> Self {
        Self { blobs, state: State::Uninitialized }
    }

    /// Creates the store and initializes it in one step.
    pub fn open(blobs: S) -> Result<Self> {
        let mut store = Self::new(blobs);
        store.initialize()?;
        Ok(store)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Loads the list from the blob store, seeding defaults if nothing is stored.
    ///
    /// Safe to call more than once: every call reloads from the blob store,
    /// discarding the in-memory list.
    ///
    /// # Errors
    ///
    /// Returns [`TreeListError::Decode`] if the stored blob is not a valid item
    /// list (the current state is kept), or any error from the blob store.
    pub fn initialize(&mut self) -> Result<()> {
        match self.blobs.get(ITEMS_KEY)? {
            Some(stored) => {
                let items: Vec<Item> = serde_json::from_str(&stored).map_err(|e| {
                    log::error!("Stored item list is corrupt: {e}");
                    e
                })?;
                log::debug!("Loaded {} items from blob store", items.len());
                self.state = State::Ready(items);
            }
            None => {
                log::info!("No stored items; seeding default tree");
                self.reset()?;
            }
        }
        Ok(())
    }

    /// Replaces the list with the default seed data and persists it,
    /// overwriting whatever was stored.
    pub fn reset(&mut self) -> Result<()> {
        let items = seed_items()?;
        self.persist(&items)?;
        self.state = State::Ready(items);
        Ok(())
    }

    /// Returns the tree view as JSON text; `"null"` when no item is marked root.
    ///
    /// # Errors
    ///
    /// Returns [`TreeListError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn read(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.read_tree()?)?)
    }

    /// Returns the tree view built from the current list.
    pub fn read_tree(&self) -> Result<Option<TreeItem>> {
        Ok(build_tree(self.items()?))
    }

    /// Decodes `patch_json` as a list of patches, applies it, and persists the list.
    ///
    /// The batch is all-or-nothing: if decoding or persisting fails, the error
    /// is logged and returned and neither the list nor the stored blob changes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeListError::NotInitialized`] before initialization,
    /// [`TreeListError::Decode`] for a malformed payload, or any error from the
    /// blob store.
    pub fn write(&mut self, patch_json: &str) -> Result<PatchReport> {
        if !self.is_ready() {
            return Err(TreeListError::NotInitialized);
        }
        let patches = decode_patches(patch_json).map_err(|e| {
            log::error!("Failed to reorder items: {e}");
            e
        })?;
        self.apply(&patches)
    }

    /// Applies already-decoded patches; see [`write`](Self::write).
    pub fn apply(&mut self, patches: &[ItemPatch]) -> Result<PatchReport> {
        let mut working = self.items()?.to_vec();
        let report = apply_patches(&mut working, patches);
        self.persist(&working).map_err(|e| {
            log::error!("Failed to persist item list: {e}");
            e
        })?;
        log::debug!(
            "Applied {} of {} patches ({} ignored, {} rejected)",
            report.applied,
            patches.len(),
            report.ignored.len(),
            report.rejected.len()
        );
        self.state = State::Ready(working);
        Ok(report)
    }

    /// The authoritative flat list.
    pub fn items(&self) -> Result<&[Item]> {
        match &self.state {
            State::Ready(items) => Ok(items),
            State::Uninitialized => Err(TreeListError::NotInitialized),
        }
    }

    /// Looks up one item by id.
    pub fn get_item(&self, id: &str) -> Result<Option<&Item>> {
        Ok(self.items()?.iter().find(|item| item.id == id))
    }

    /// Returns the items whose parent is `parent_id`, ascending by `order`.
    ///
    /// Equal orders keep list order.
    pub fn get_children(&self, parent_id: &str) -> Result<Vec<&Item>> {
        let mut children: Vec<&Item> = self
            .items()?
            .iter()
            .filter(|item| !item.is_root() && item.parent_id.as_deref() == Some(parent_id))
            .collect();
        children.sort_by_key(|item| item.order);
        Ok(children)
    }

    pub fn blob_store(&self) -> &S {
        &self.blobs
    }

    pub fn into_blob_store(self) -> S {
        self.blobs
    }

    fn persist(&mut self, items: &[Item]) -> Result<()> {
        let blob = serde_json::to_string(items)?;
        self.blobs.set(ITEMS_KEY, &blob)
    }
}
