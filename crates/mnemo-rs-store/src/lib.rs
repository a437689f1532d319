//! Read-only document-store contract consumed by the retrieval planner.
//!
//! This crate defines the three primitive read operations the planner may
//! issue and the record/filter/projection types they exchange. No write
//! operation exists anywhere on this surface: components holding a
//! `DocumentStore` handle structurally cannot mutate the store.

pub mod error;
pub mod filter;
pub mod include;
pub mod record;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// Metadata filter predicate tree.
pub use filter::Filter;
/// Field projection for read operations.
pub use include::{Include, IncludeField};
/// Record types returned by the store.
pub use record::{ScoredRecord, StoredRecord};
/// Read-only store trait and query bounds.
pub use store::{DocumentStore, TOP_K_MAX, TOP_K_MIN, validate_top_k};
