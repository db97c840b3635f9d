//! Error types for the Tree-List core library.

use thiserror::Error;

/// All errors that can occur within the Tree-List core library.
///
/// Unknown ids in a patch are not errors; they are reported through
/// [`PatchReport`](crate::PatchReport) instead.
#[derive(Debug, Error)]
pub enum TreeListError {
    /// A payload or stored blob could not be decoded from (or encoded to) JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A SQLite operation in the blob store failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The opened file is not a valid item store database.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// `read` or `write` was called before the store was initialized.
    #[error("Store is not initialized")]
    NotInitialized,
}

/// Convenience alias that pins the error type to [`TreeListError`].
pub type Result<T> = std::result::Result<T, TreeListError>;

impl TreeListError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Decode(e) => format!("Data format error: {e}"),
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::InvalidStore(_) => "Could not open item store file".to_string(),
            Self::NotInitialized => "Item store has not been initialized".to_string(),
        }
    }

    /// `true` for errors caused by the caller's payload rather than the backing store.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
