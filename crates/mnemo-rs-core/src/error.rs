//! Error types for planning and retrieval.

use mnemo_rs_store::StoreError;

/// Errors returned by the selector and planner.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Task context name not recognized at the string boundary.
    #[error("unknown task context: {0}")]
    UnknownContext(String),
    /// Freeform hint named a category outside the catalog.
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    /// The caller cancelled the plan at a group boundary.
    #[error("retrieval cancelled")]
    Cancelled,
    /// Store-level failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
