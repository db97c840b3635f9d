//! Core library for Tree-List Sync: a single-rooted item tree persisted as a
//! flat, ordered list.
//!
//! The primary entry point is [`ItemStore`], which owns the authoritative
//! list and writes it through to a [`BlobStore`] after every mutation. The
//! free functions [`flatten`], [`build_tree`] and [`apply_patches`] convert
//! between the flat and tree forms and merge sparse updates.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    error::{Result, TreeListError},
    flatten::flatten,
    item::{Item, TreeItem, MAX_DEPTH, ROOT_MARKER},
    patch::{apply_patches, decode_patches, ItemPatch, PatchReport},
    seed::{seed_items, seed_tree},
    storage::{BlobStore, MemoryBlobStore, SqliteBlobStore},
    store::{ItemStore, ITEMS_KEY},
    tree::build_tree,
};
