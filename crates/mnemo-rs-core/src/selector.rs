//! Query strategy selection: deterministic, table-driven mapping from a
//! task context to a query plan.
//!
//! The selector is the single producer of multi-field filters, so the
//! AND-tree requirement of the store (a flat multi-key map is rejected) is
//! enforced in exactly one place.

use crate::catalog::{CATEGORY_FIELD, Category, LONGTERM_TYPE, SESSION_TYPE, TYPE_FIELD, long_term_ids};
use crate::config::RetrievalConfig;
use crate::context::{FreeformHints, TaskContext};
use crate::error::RetrievalError;
use crate::plan::{QueryPlan, Step};
use log::debug;
use mnemo_rs_store::{Filter, Include, IncludeField, StoreError, validate_top_k};

/// Filter selecting all session records.
fn session_filter() -> Filter {
    Filter::eq(TYPE_FIELD, SESSION_TYPE)
}

/// Conjunctive filter scoping a semantic query to one long-term category.
/// Always the explicit AND-tree form; the store rejects the flat spelling.
fn category_scope(category: Category) -> Filter {
    Filter::and(vec![
        Filter::eq(TYPE_FIELD, LONGTERM_TYPE),
        Filter::eq(CATEGORY_FIELD, category.as_str()),
    ])
}

/// Projection for semantic hits: content plus relevance distances.
fn semantic_include() -> Include {
    Include::fields(vec![
        IncludeField::Documents,
        IncludeField::Metadatas,
        IncludeField::Distances,
    ])
}

/// Direct fetch of the singleton records for the given categories.
fn fetch_categories(categories: &[Category]) -> Step {
    Step::GetByIds {
        ids: long_term_ids(categories),
        include: Include::content(),
    }
}

/// Semantic query bounded to one long-term category.
fn scoped_semantic(text: &str, category: Category, config: &RetrievalConfig) -> Step {
    Step::SemanticQuery {
        text: text.to_string(),
        top_k: config.semantic_top_k,
        filter: Some(category_scope(category)),
        include: semantic_include(),
        scope: Some(category),
    }
}

/// Build the query plan for a task context.
///
/// Fails before any store call: `InvalidCategory` for freeform hints
/// outside the catalog, `InvalidQuery` for out-of-range caps or empty
/// hints.
pub fn build_plan(
    context: &TaskContext,
    config: &RetrievalConfig,
) -> Result<QueryPlan, RetrievalError> {
    config.validate()?;
    let plan = match context {
        TaskContext::SessionStart => {
            let mut plan = QueryPlan::new();
            plan.push_group(vec![
                Step::GetByFilter {
                    filter: session_filter(),
                    include: Include::metadata(),
                },
                fetch_categories(&[Category::UserPrefs, Category::ProjectOverview]),
            ]);
            plan.push_group(vec![Step::HydrateRecent {
                take: config.recent_window,
            }]);
            plan
        }
        TaskContext::FeatureDevelopment { topic } => QueryPlan::sequential(vec![
            fetch_categories(&[Category::UserPrefs]),
            fetch_categories(&[Category::Architecture]),
            scoped_semantic(topic, Category::TechKnowledge, config),
            scoped_semantic(topic, Category::LessonsLearned, config),
        ]),
        TaskContext::Debugging { symptom } => QueryPlan::sequential(vec![
            scoped_semantic(symptom, Category::LessonsLearned, config),
            scoped_semantic(symptom, Category::TechKnowledge, config),
            fetch_categories(&[Category::IssuesAndRoadmap]),
        ]),
        TaskContext::ArchitectureDecision => QueryPlan::sequential(vec![
            fetch_categories(&[Category::UserPrefs]),
            fetch_categories(&[Category::Architecture]),
            fetch_categories(&[Category::TechKnowledge]),
        ]),
        TaskContext::PlanningOrRefactor => QueryPlan::sequential(vec![
            fetch_categories(&[Category::IssuesAndRoadmap]),
            fetch_categories(&[Category::Architecture]),
            fetch_categories(&[Category::UserPrefs]),
        ]),
        TaskContext::RecallPriorSession { query } => {
            QueryPlan::sequential(vec![Step::SemanticQuery {
                text: query.clone(),
                top_k: config.recall_top_k,
                filter: Some(session_filter()),
                include: semantic_include(),
                scope: None,
            }])
        }
        TaskContext::Freeform(hints) => freeform_plan(hints)?,
    };
    debug!(
        "built query plan (groups={}, steps={})",
        plan.groups.len(),
        plan.step_count()
    );
    Ok(plan)
}

/// Minimal plan for caller-directed hints; nothing speculative.
fn freeform_plan(hints: &FreeformHints) -> Result<QueryPlan, RetrievalError> {
    let mut categories = Vec::with_capacity(hints.categories.len());
    for name in &hints.categories {
        categories.push(name.parse::<Category>()?);
    }
    let mut steps = Vec::new();
    if !categories.is_empty() {
        steps.push(fetch_categories(&categories));
    }
    if let Some(hint) = &hints.semantic {
        validate_top_k(hint.top_k)?;
        steps.push(Step::SemanticQuery {
            text: hint.query.clone(),
            top_k: hint.top_k,
            filter: None,
            include: semantic_include(),
            scope: None,
        });
    }
    if steps.is_empty() {
        return Err(RetrievalError::Store(StoreError::InvalidQuery(
            "freeform hints request nothing".to_string(),
        )));
    }
    // Hints are independent of each other: one parallel group.
    let mut plan = QueryPlan::new();
    plan.push_group(steps);
    Ok(plan)
}
