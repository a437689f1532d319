//! The read-only document-store trait.

use crate::error::StoreError;
use crate::filter::Filter;
use crate::include::Include;
use crate::record::{ScoredRecord, StoredRecord};
use async_trait::async_trait;

/// Smallest accepted `top_k` for semantic queries.
pub const TOP_K_MIN: usize = 1;
/// Largest accepted `top_k` for semantic queries. Guards against
/// unbounded result loads.
pub const TOP_K_MAX: usize = 20;

/// Reject a `top_k` outside the accepted bounds.
pub fn validate_top_k(top_k: usize) -> Result<(), StoreError> {
    if (TOP_K_MIN..=TOP_K_MAX).contains(&top_k) {
        Ok(())
    } else {
        Err(StoreError::InvalidQuery(format!(
            "top_k must be in [{TOP_K_MIN}, {TOP_K_MAX}], got {top_k}"
        )))
    }
}

#[async_trait]
/// Read-only handle to the external document store.
///
/// This trait is the whole capability the planner is ever given: it has no
/// write, update, or delete operation, so the never-write policy holds by
/// construction. The writer role uses a different interface that this
/// workspace does not define.
pub trait DocumentStore: Send + Sync {
    /// Fetch records by id with the given projection.
    ///
    /// When some ids are absent the call fails with
    /// [`StoreError::NotFoundPartial`], which carries the subset found;
    /// callers must not assume completeness.
    async fn get_by_ids(
        &self,
        ids: &[String],
        include: &Include,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Fetch records whose metadata satisfies the filter.
    ///
    /// An invalid filter (empty tree, flat multi-key map) fails with
    /// [`StoreError::InvalidQuery`]; there is no unfiltered scan.
    async fn get_by_filter(
        &self,
        filter: &Filter,
        include: &Include,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Fetch up to `top_k` records by semantic similarity to `text`,
    /// ordered by descending relevance, optionally restricted by a filter.
    ///
    /// `top_k` outside `[TOP_K_MIN, TOP_K_MAX]` fails with
    /// [`StoreError::InvalidQuery`].
    async fn semantic_query(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&Filter>,
        include: &Include,
    ) -> Result<Vec<ScoredRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::validate_top_k;

    #[test]
    fn top_k_bounds_are_inclusive() {
        assert!(validate_top_k(0).is_err());
        assert!(validate_top_k(1).is_ok());
        assert!(validate_top_k(5).is_ok());
        assert!(validate_top_k(20).is_ok());
        assert!(validate_top_k(21).is_err());
    }
}
