//! Test helpers shared across mnemo crates.

pub mod store;

pub use store::{OpKind, StoreCall, StubStore, longterm_record, session_record};
