//! Task contexts supplied by the agent runtime.

use crate::error::RetrievalError;

/// What the agent is about to do. Drives strategy selection.
///
/// Contexts that issue semantic queries carry an opaque query string; the
/// planner performs no phrasing or NLP of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskContext {
    /// A new session is starting; load orientation and recent sessions.
    SessionStart,
    /// Implementing a feature around the given topic.
    FeatureDevelopment {
        /// Natural-language description of the work.
        topic: String,
    },
    /// Investigating a failure.
    Debugging {
        /// Natural-language description of the symptom.
        symptom: String,
    },
    /// Making an architecture decision.
    ArchitectureDecision,
    /// Planning or refactoring work.
    PlanningOrRefactor,
    /// "Have we done something like this before?"
    RecallPriorSession {
        /// Natural-language recall query.
        query: String,
    },
    /// Caller-directed plan with explicit hints, nothing speculative.
    Freeform(FreeformHints),
}

/// Explicit hints for a freeform retrieval.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeformHints {
    /// Long-term categories to fetch, by wire name. Validated against the
    /// catalog before any store call.
    pub categories: Vec<String>,
    /// Optional semantic lookup.
    pub semantic: Option<SemanticHint>,
}

/// A caller-supplied semantic lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticHint {
    /// Opaque query text.
    pub query: String,
    /// Result cap, bounded by the store's accepted range.
    pub top_k: usize,
}

impl TaskContext {
    /// Map a wire name plus optional query argument to a context.
    ///
    /// Freeform contexts carry structured hints and are constructed
    /// directly, not parsed. Unknown names fail with
    /// [`RetrievalError::UnknownContext`].
    pub fn parse(name: &str, query: Option<&str>) -> Result<TaskContext, RetrievalError> {
        let arg = query.unwrap_or_default();
        match name {
            "session_start" => Ok(TaskContext::SessionStart),
            "feature_development" => Ok(TaskContext::FeatureDevelopment {
                topic: arg.to_string(),
            }),
            "debugging" => Ok(TaskContext::Debugging {
                symptom: arg.to_string(),
            }),
            "architecture_decision" => Ok(TaskContext::ArchitectureDecision),
            "planning_or_refactor" => Ok(TaskContext::PlanningOrRefactor),
            "recall_prior_session" => Ok(TaskContext::RecallPriorSession {
                query: arg.to_string(),
            }),
            other => Err(RetrievalError::UnknownContext(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskContext;
    use crate::error::RetrievalError;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_names_parse() {
        assert_eq!(
            TaskContext::parse("session_start", None).expect("parse"),
            TaskContext::SessionStart
        );
        assert_eq!(
            TaskContext::parse("debugging", Some("panic in planner")).expect("parse"),
            TaskContext::Debugging {
                symptom: "panic in planner".to_string()
            }
        );
    }

    #[test]
    fn unknown_name_fails() {
        let err = TaskContext::parse("daydreaming", None).expect_err("must fail");
        assert!(matches!(err, RetrievalError::UnknownContext(name) if name == "daydreaming"));
    }
}
