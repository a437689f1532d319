//! Static catalog of long-term memory categories and the session schema.
//!
//! Exactly one long-term record exists per category; identifier and
//! category are in 1:1 correspondence and never change. The catalog is the
//! only source of record identifiers — no component ever guesses one.

use crate::error::RetrievalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata field holding the record kind.
pub const TYPE_FIELD: &str = "type";
/// `type` value for long-term records.
pub const LONGTERM_TYPE: &str = "longterm";
/// `type` value for session records.
pub const SESSION_TYPE: &str = "session";
/// Metadata field holding a long-term record's category.
pub const CATEGORY_FIELD: &str = "category";
/// Session metadata: session token.
pub const SESSION_ID_FIELD: &str = "session_id";
/// Session metadata: originating workflow node.
pub const NODE_ID_FIELD: &str = "node_id";
/// Session metadata: creation time, recency-sortable.
pub const TIMESTAMP_FIELD: &str = "timestamp";
/// Session metadata: short human-readable summary.
pub const TOPIC_FIELD: &str = "topic";

/// The six fixed long-term memory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// User preferences and working style.
    UserPrefs,
    /// What the project is and why.
    ProjectOverview,
    /// System architecture and component boundaries.
    Architecture,
    /// Accumulated technical knowledge.
    TechKnowledge,
    /// Lessons learned from past mistakes.
    LessonsLearned,
    /// Known issues and the roadmap.
    IssuesAndRoadmap,
}

impl Category {
    /// All categories in catalog order. Assembly order follows this.
    pub const ALL: [Category; 6] = [
        Category::UserPrefs,
        Category::ProjectOverview,
        Category::Architecture,
        Category::TechKnowledge,
        Category::LessonsLearned,
        Category::IssuesAndRoadmap,
    ];

    /// Wire name for the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::UserPrefs => "user_prefs",
            Category::ProjectOverview => "project_overview",
            Category::Architecture => "architecture",
            Category::TechKnowledge => "tech_knowledge",
            Category::LessonsLearned => "lessons_learned",
            Category::IssuesAndRoadmap => "issues_and_roadmap",
        }
    }

    /// Fixed store identifier for the category's singleton record.
    pub fn record_id(self) -> &'static str {
        match self {
            Category::UserPrefs => "ltm_user_prefs",
            Category::ProjectOverview => "ltm_project_overview",
            Category::Architecture => "ltm_architecture",
            Category::TechKnowledge => "ltm_tech_knowledge",
            Category::LessonsLearned => "ltm_lessons_learned",
            Category::IssuesAndRoadmap => "ltm_issues_and_roadmap",
        }
    }

    /// Resolve a store identifier back to its category.
    pub fn from_record_id(id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.record_id() == id)
    }

    /// Whether a wire name denotes a catalog category.
    pub fn is_valid(name: &str) -> bool {
        name.parse::<Category>().is_ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RetrievalError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| RetrievalError::InvalidCategory(name.to_string()))
    }
}

/// Store identifiers for the given categories, in the given order.
/// Pure lookup, no I/O.
pub fn long_term_ids(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|category| category.record_id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Category, long_term_ids};
    use pretty_assertions::assert_eq;

    #[test]
    fn record_ids_are_distinct_and_reversible() {
        for category in Category::ALL {
            assert_eq!(Category::from_record_id(category.record_id()), Some(category));
        }
        let ids = long_term_ids(&Category::ALL);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn wire_names_parse_back() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().ok(), Some(category));
        }
        assert!("not_a_category".parse::<Category>().is_err());
        assert!(Category::is_valid("lessons_learned"));
        assert!(!Category::is_valid("not_a_category"));
    }

    #[test]
    fn unknown_record_id_resolves_to_none() {
        assert_eq!(Category::from_record_id("session-123"), None);
    }
}
