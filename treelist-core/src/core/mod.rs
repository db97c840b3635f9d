//! Internal domain modules for the Tree-List core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod error;
pub mod flatten;
pub mod item;
pub mod patch;
pub mod seed;
pub mod storage;
pub mod store;
pub mod tree;

#[doc(inline)]
pub use error::{Result, TreeListError};
#[doc(inline)]
pub use flatten::flatten;
#[doc(inline)]
pub use item::{Item, TreeItem, MAX_DEPTH, ROOT_MARKER};
#[doc(inline)]
pub use patch::{apply_patches, decode_patches, ItemPatch, PatchReport};
#[doc(inline)]
pub use seed::{seed_items, seed_tree};
#[doc(inline)]
pub use storage::{BlobStore, MemoryBlobStore, SqliteBlobStore};
#[doc(inline)]
pub use store::{ItemStore, ITEMS_KEY};
#[doc(inline)]
pub use tree::build_tree;
