//! Error types for document-store operations.

use crate::record::StoredRecord;

/// Errors returned by document-store read operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed query rejected before reaching the store.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Some requested ids are absent; the found subset is carried along.
    #[error("partial result: {} ids missing", .missing.len())]
    NotFoundPartial {
        /// Records that were found.
        found: Vec<StoredRecord>,
        /// Ids the store could not supply.
        missing: Vec<String>,
    },
    /// Transport or timeout failure talking to the store.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
