//! Query plans: the reified, testable form of a retrieval strategy.
//!
//! A plan is an ordered list of groups. Steps within one group have no
//! data dependency on each other and may run concurrently; a later group
//! may depend on results of earlier groups (the executor places a barrier
//! between groups).

use crate::catalog::Category;
use mnemo_rs_store::{Filter, Include};

/// One primitive operation within a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Direct fetch by catalog or session record ids.
    GetByIds {
        /// Record ids to fetch.
        ids: Vec<String>,
        /// Field projection.
        include: Include,
    },
    /// Metadata-filtered fetch.
    GetByFilter {
        /// Predicate over record metadata.
        filter: Filter,
        /// Field projection.
        include: Include,
    },
    /// Semantic similarity lookup.
    SemanticQuery {
        /// Opaque query text.
        text: String,
        /// Result cap.
        top_k: usize,
        /// Optional metadata restriction.
        filter: Option<Filter>,
        /// Field projection.
        include: Include,
        /// Category this query is bounded to, when any. A scoped query
        /// with zero hits marks the category's record id unresolved.
        scope: Option<Category>,
    },
    /// Derived step: rank session metadata gathered by earlier groups and
    /// fetch full content for the top-`take` recent window only.
    HydrateRecent {
        /// Recent-window size.
        take: usize,
    },
}

/// Steps sharing one parallel-group tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanGroup {
    /// Concurrently dispatchable steps.
    pub steps: Vec<Step>,
}

/// An ordered, partially-parallel sequence of store operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPlan {
    /// Groups in execution order; the index is the parallel-group tag.
    pub groups: Vec<PlanGroup>,
}

impl QueryPlan {
    /// Plan with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group of concurrent steps.
    pub fn push_group(&mut self, steps: Vec<Step>) {
        self.groups.push(PlanGroup { steps });
    }

    /// Plan running each step in its own group, strictly in order.
    pub fn sequential(steps: Vec<Step>) -> Self {
        let mut plan = Self::new();
        for step in steps {
            plan.push_group(vec![step]);
        }
        plan
    }

    /// Total number of steps across all groups.
    pub fn step_count(&self) -> usize {
        self.groups.iter().map(|group| group.steps.len()).sum()
    }
}

/// Which plan step produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    /// Parallel-group tag.
    pub group: usize,
    /// Step index within the group.
    pub step: usize,
}

#[cfg(test)]
mod tests {
    use super::{QueryPlan, Step};
    use mnemo_rs_store::Include;
    use pretty_assertions::assert_eq;

    #[test]
    fn sequential_puts_each_step_in_its_own_group() {
        let plan = QueryPlan::sequential(vec![
            Step::GetByIds {
                ids: vec!["a".to_string()],
                include: Include::content(),
            },
            Step::GetByIds {
                ids: vec!["b".to_string()],
                include: Include::content(),
            },
        ]);
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.step_count(), 2);
        assert_eq!(plan.groups[0].steps.len(), 1);
    }
}
