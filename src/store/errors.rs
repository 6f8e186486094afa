//! Storage error types.

use thiserror::Error;

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failures.
///
/// All variants are unrecoverable for the request in flight; callers
/// surface them as a generic server error and never retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend engine failure (I/O, SQL, poisoned lock)
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A persisted row no longer decodes to a valid incident
    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
