//! Retrieval policy for tiered agent memory.
//!
//! Maps a task context to a query plan over a read-only document store,
//! executes the plan with explicit parallel groups, ranks session records
//! by recency, hydrates only a bounded recent window, and assembles the
//! results into an ordered memory context.

pub mod assemble;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod plan;
pub mod planner;
pub mod selector;
pub mod session;

/// Result assembly types.
pub use assemble::{EntryLabel, MemoryEntry, RetrievalResult, StepFailure};
/// Long-term category catalog and session schema.
pub use catalog::{Category, long_term_ids};
/// Planner configuration.
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
/// Task contexts supplied by the agent runtime.
pub use context::{FreeformHints, SemanticHint, TaskContext};
/// Retrieval error type.
pub use error::RetrievalError;
/// Query plans and steps.
pub use plan::{PlanGroup, Provenance, QueryPlan, Step};
/// Plan executor.
pub use planner::{CancelToken, RetrievalPlanner};
/// Context-to-plan mapping.
pub use selector::build_plan;
/// Session metadata and recency ranking.
pub use session::{SessionMeta, rank_sessions};
