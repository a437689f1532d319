//! Plan execution against the read-only store.
//!
//! Steps within one group are dispatched concurrently; the planner waits
//! for the whole group before starting the next (a barrier, not a
//! pipeline), so later groups may rank and hydrate from earlier results.

use crate::assemble::{ResolvedRecord, RetrievalResult, StepFailure, assemble};
use crate::config::RetrievalConfig;
use crate::context::TaskContext;
use crate::error::RetrievalError;
use crate::plan::{Provenance, QueryPlan, Step};
use crate::selector::build_plan;
use crate::session::{SessionMeta, rank_sessions};
use futures_util::future::join_all;
use log::{debug, info, warn};
use mnemo_rs_store::{DocumentStore, Include, StoreError, StoredRecord, validate_top_k};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation handle, checked at group boundaries.
///
/// Steps already dispatched in the current group run to completion; there
/// is no hard-cancel mid-call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation at the next group boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// What one step produced; failures that do not abort the plan are
/// carried here instead of as errors.
struct StepOutcome {
    provenance: Provenance,
    records: Vec<StoredRecord>,
    missing: Vec<String>,
    failure: Option<String>,
}

impl StepOutcome {
    fn empty(provenance: Provenance) -> Self {
        Self {
            provenance,
            records: Vec::new(),
            missing: Vec::new(),
            failure: None,
        }
    }
}

/// Accumulated execution state, mutated only at group barriers.
#[derive(Default)]
struct ExecState {
    resolved: BTreeMap<String, ResolvedRecord>,
    sessions: Vec<SessionMeta>,
    unresolved: BTreeSet<String>,
    failures: Vec<StepFailure>,
}

impl ExecState {
    /// Barrier merge of one step's outcome.
    ///
    /// Within a group the first step to resolve an id keeps it; a fetch
    /// from a later group replaces an earlier one (fresher read wins).
    fn merge(&mut self, outcome: StepOutcome) {
        for record in outcome.records {
            if let Some(meta) = SessionMeta::from_record(&record) {
                if !self.sessions.iter().any(|known| known.id == meta.id) {
                    self.sessions.push(meta);
                }
            }
            let same_group = self
                .resolved
                .get(&record.id)
                .is_some_and(|existing| existing.provenance.group == outcome.provenance.group);
            if !same_group {
                self.resolved.insert(
                    record.id.clone(),
                    ResolvedRecord {
                        record,
                        provenance: outcome.provenance,
                    },
                );
            }
        }
        self.unresolved.extend(outcome.missing);
        if let Some(error) = outcome.failure {
            self.failures.push(StepFailure {
                provenance: outcome.provenance,
                error,
            });
        }
    }

    /// Whether a record still needs its document fetched.
    fn needs_document(&self, id: &str) -> bool {
        self.resolved
            .get(id)
            .is_none_or(|hit| hit.record.document.is_none())
    }
}

/// Executes query plans against an injected read-only store handle.
pub struct RetrievalPlanner {
    store: Arc<dyn DocumentStore>,
    config: RetrievalConfig,
}

impl RetrievalPlanner {
    /// Create a planner over a store handle.
    pub fn new(store: Arc<dyn DocumentStore>, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Build and execute the plan for a task context.
    pub async fn retrieve(&self, context: &TaskContext) -> Result<RetrievalResult, RetrievalError> {
        self.retrieve_with_cancel(context, &CancelToken::new())
            .await
    }

    /// Build and execute the plan for a task context with a caller-held
    /// cancellation token.
    pub async fn retrieve_with_cancel(
        &self,
        context: &TaskContext,
        cancel: &CancelToken,
    ) -> Result<RetrievalResult, RetrievalError> {
        let plan = build_plan(context, &self.config)?;
        self.execute(&plan, cancel).await
    }

    /// Execute a prepared plan.
    ///
    /// Validation errors (`InvalidQuery`) abort the whole plan; absent
    /// records and store outages degrade to `unresolved` ids and step
    /// failures on the result.
    pub async fn execute(
        &self,
        plan: &QueryPlan,
        cancel: &CancelToken,
    ) -> Result<RetrievalResult, RetrievalError> {
        let mut state = ExecState::default();
        for (group_idx, group) in plan.groups.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("retrieval cancelled at group boundary (group={group_idx})");
                return Err(RetrievalError::Cancelled);
            }
            debug!(
                "dispatching plan group (group={}, steps={})",
                group_idx,
                group.steps.len()
            );
            let outcomes = join_all(group.steps.iter().enumerate().map(|(step_idx, step)| {
                self.run_step(
                    Provenance {
                        group: group_idx,
                        step: step_idx,
                    },
                    step,
                    &state,
                )
            }))
            .await;
            for outcome in outcomes {
                state.merge(outcome?);
            }
        }

        let ExecState {
            resolved,
            sessions,
            unresolved,
            failures,
        } = state;
        let ranked = rank_sessions(sessions);
        let result = assemble(&resolved, &ranked, unresolved, failures);
        info!(
            "retrieval complete (entries={}, unresolved={}, failures={})",
            result.entries.len(),
            result.unresolved.len(),
            result.failures.len()
        );
        Ok(result)
    }

    async fn run_step(
        &self,
        provenance: Provenance,
        step: &Step,
        state: &ExecState,
    ) -> Result<StepOutcome, RetrievalError> {
        match step {
            Step::GetByIds { ids, include } => self.fetch_ids(provenance, ids, include).await,
            Step::GetByFilter { filter, include } => {
                filter.validate()?;
                match self.store.get_by_filter(filter, include).await {
                    Ok(records) => {
                        debug!(
                            "filtered fetch (group={}, step={}, records={})",
                            provenance.group,
                            provenance.step,
                            records.len()
                        );
                        Ok(StepOutcome {
                            records,
                            ..StepOutcome::empty(provenance)
                        })
                    }
                    Err(StoreError::Unavailable(reason)) => {
                        warn!(
                            "store unavailable for filtered fetch (group={}, step={}): {reason}",
                            provenance.group, provenance.step
                        );
                        Ok(StepOutcome {
                            failure: Some(reason),
                            ..StepOutcome::empty(provenance)
                        })
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Step::SemanticQuery {
                text,
                top_k,
                filter,
                include,
                scope,
            } => {
                validate_top_k(*top_k)?;
                if let Some(filter) = filter {
                    filter.validate()?;
                }
                match self
                    .store
                    .semantic_query(text, *top_k, filter.as_ref(), include)
                    .await
                {
                    Ok(scored) => {
                        debug!(
                            "semantic query (group={}, step={}, hits={})",
                            provenance.group,
                            provenance.step,
                            scored.len()
                        );
                        let mut outcome = StepOutcome::empty(provenance);
                        if scored.is_empty() {
                            // A category-scoped query with no hits means the
                            // singleton record is absent or unfindable.
                            if let Some(category) = scope {
                                outcome.missing.push(category.record_id().to_string());
                            }
                        }
                        outcome.records = scored.into_iter().map(|hit| hit.record).collect();
                        Ok(outcome)
                    }
                    Err(StoreError::Unavailable(reason)) => {
                        warn!(
                            "store unavailable for semantic query (group={}, step={}): {reason}",
                            provenance.group, provenance.step
                        );
                        let mut outcome = StepOutcome::empty(provenance);
                        if let Some(category) = scope {
                            outcome.missing.push(category.record_id().to_string());
                        }
                        outcome.failure = Some(reason);
                        Ok(outcome)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Step::HydrateRecent { take } => {
                let window: Vec<String> = rank_sessions(state.sessions.clone())
                    .into_iter()
                    .take(*take)
                    .map(|meta| meta.id)
                    .filter(|id| state.needs_document(id))
                    .collect();
                if window.is_empty() {
                    debug!(
                        "recent window already hydrated or empty (group={}, step={})",
                        provenance.group, provenance.step
                    );
                    return Ok(StepOutcome::empty(provenance));
                }
                debug!(
                    "hydrating recent window (group={}, step={}, ids={})",
                    provenance.group,
                    provenance.step,
                    window.len()
                );
                self.fetch_ids(provenance, &window, &Include::content())
                    .await
            }
        }
    }

    /// Direct fetch with partial-failure degradation.
    async fn fetch_ids(
        &self,
        provenance: Provenance,
        ids: &[String],
        include: &Include,
    ) -> Result<StepOutcome, RetrievalError> {
        match self.store.get_by_ids(ids, include).await {
            Ok(records) => Ok(StepOutcome {
                records,
                ..StepOutcome::empty(provenance)
            }),
            Err(StoreError::NotFoundPartial { found, missing }) => {
                debug!(
                    "partial fetch (group={}, step={}, found={}, missing={})",
                    provenance.group,
                    provenance.step,
                    found.len(),
                    missing.len()
                );
                Ok(StepOutcome {
                    records: found,
                    missing,
                    ..StepOutcome::empty(provenance)
                })
            }
            Err(StoreError::Unavailable(reason)) => {
                warn!(
                    "store unavailable for direct fetch (group={}, step={}): {reason}",
                    provenance.group, provenance.step
                );
                Ok(StepOutcome {
                    missing: ids.to_vec(),
                    failure: Some(reason),
                    ..StepOutcome::empty(provenance)
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CancelToken;

    #[test]
    fn cancel_token_is_shared_across_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
