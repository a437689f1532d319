//! Metadata filter predicates and their wire form.
//!
//! The store accepts a single-field equality map (`{"type": "session"}`)
//! or an explicit combinator tree (`{"$and": [...]}` / `{"$or": [...]}`).
//! A flat map with multiple keys is ambiguous and rejected; multi-field
//! conjunctions must be spelled as an AND-tree.

use crate::error::StoreError;
use serde_json::{Map, Value, json};

/// Combinator key for conjunctions in the wire form.
const AND_KEY: &str = "$and";
/// Combinator key for disjunctions in the wire form.
const OR_KEY: &str = "$or";

/// Predicate tree over equality terms on metadata fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value` on a metadata field.
    Eq(String, Value),
    /// All branches must hold.
    And(Vec<Filter>),
    /// At least one branch must hold.
    Or(Vec<Filter>),
}

impl Filter {
    /// Equality term on a metadata field.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Conjunction of branches.
    pub fn and(branches: Vec<Filter>) -> Self {
        Self::And(branches)
    }

    /// Disjunction of branches.
    pub fn or(branches: Vec<Filter>) -> Self {
        Self::Or(branches)
    }

    /// Reject empty trees; empty filters would scan the whole collection.
    pub fn validate(&self) -> Result<(), StoreError> {
        match self {
            Self::Eq(field, _) if field.is_empty() => Err(StoreError::InvalidQuery(
                "filter field name is empty".to_string(),
            )),
            Self::Eq(..) => Ok(()),
            Self::And(branches) | Self::Or(branches) => {
                if branches.is_empty() {
                    return Err(StoreError::InvalidQuery(
                        "filter combinator has no branches".to_string(),
                    ));
                }
                for branch in branches {
                    branch.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Serialize to the store wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Eq(field, value) => json!({ field.clone(): value.clone() }),
            Self::And(branches) => {
                json!({ AND_KEY: branches.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
            Self::Or(branches) => {
                json!({ OR_KEY: branches.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
        }
    }

    /// Parse the store wire form.
    ///
    /// A flat map with more than one key is rejected: the caller must say
    /// whether it means AND or OR with an explicit combinator.
    pub fn from_value(value: &Value) -> Result<Self, StoreError> {
        let map = value.as_object().ok_or_else(|| {
            StoreError::InvalidQuery(format!("filter must be a JSON object, got {value}"))
        })?;
        Self::from_map(map)
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, StoreError> {
        match map.iter().next() {
            None => Err(StoreError::InvalidQuery(
                "filter object is empty".to_string(),
            )),
            Some(_) if map.len() > 1 => Err(StoreError::InvalidQuery(format!(
                "flat multi-key filter is ambiguous; use an explicit {AND_KEY}/{OR_KEY} tree"
            ))),
            Some((key, value)) => match key.as_str() {
                AND_KEY => Ok(Self::And(Self::parse_branches(key, value)?)),
                OR_KEY => Ok(Self::Or(Self::parse_branches(key, value)?)),
                field if field.starts_with('$') => Err(StoreError::InvalidQuery(format!(
                    "unknown filter operator: {field}"
                ))),
                field => Ok(Self::Eq(field.to_string(), value.clone())),
            },
        }
    }

    fn parse_branches(key: &str, value: &Value) -> Result<Vec<Filter>, StoreError> {
        let items = value.as_array().ok_or_else(|| {
            StoreError::InvalidQuery(format!("{key} expects an array of filters"))
        })?;
        if items.is_empty() {
            return Err(StoreError::InvalidQuery(format!("{key} array is empty")));
        }
        items.iter().map(Self::from_value).collect()
    }

    /// Evaluate the predicate against a metadata map.
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        match self {
            Self::Eq(field, value) => metadata.get(field) == Some(value),
            Self::And(branches) => branches.iter().all(|branch| branch.matches(metadata)),
            Self::Or(branches) => branches.iter().any(|branch| branch.matches(metadata)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn single_key_map_parses_to_eq() {
        let filter = Filter::from_value(&json!({"type": "session"})).expect("parse");
        assert_eq!(filter, Filter::eq("type", "session"));
    }

    #[test]
    fn flat_multi_key_map_is_rejected() {
        let err = Filter::from_value(&json!({"type": "longterm", "category": "x"}))
            .expect_err("must reject");
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn and_tree_round_trips() {
        let filter = Filter::and(vec![
            Filter::eq("type", "longterm"),
            Filter::eq("category", "tech_knowledge"),
        ]);
        let wire = filter.to_value();
        assert_eq!(
            wire,
            json!({"$and": [{"type": "longterm"}, {"category": "tech_knowledge"}]})
        );
        assert_eq!(Filter::from_value(&wire).expect("parse"), filter);
    }

    #[test]
    fn empty_object_and_empty_combinator_are_rejected() {
        assert!(Filter::from_value(&json!({})).is_err());
        assert!(Filter::from_value(&json!({"$and": []})).is_err());
        assert!(Filter::and(Vec::new()).validate().is_err());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = Filter::from_value(&json!({"$not": {"type": "session"}})).expect_err("reject");
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn matches_evaluates_combinators() {
        let filter = Filter::and(vec![
            Filter::eq("type", "longterm"),
            Filter::or(vec![
                Filter::eq("category", "architecture"),
                Filter::eq("category", "tech_knowledge"),
            ]),
        ]);
        let meta = json!({"type": "longterm", "category": "architecture"});
        let meta = meta.as_object().expect("object");
        assert!(filter.matches(meta));
        let other = json!({"type": "session", "category": "architecture"});
        assert!(!filter.matches(other.as_object().expect("object")));
    }
}
