//! Public SDK surface for the mnemo retrieval planner.
//!
//! This crate re-exports the policy layer and the store contract, and
//! provides a small initialization helper to keep consumer setup
//! consistent.

/// Re-export for convenience.
pub use mnemo_rs_core as core;
/// Re-export for convenience.
pub use mnemo_rs_store as store;

pub use mnemo_rs_core::{
    CancelToken, Category, RetrievalConfig, RetrievalError, RetrievalPlanner, RetrievalResult,
    TaskContext,
};
pub use mnemo_rs_store::{DocumentStore, Filter, Include, StoreError};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Consumers are still
/// expected to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
