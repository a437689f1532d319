//! Projection of optional record fields for read operations.

use serde::{Deserialize, Serialize};

/// A projectable record field. Identifiers are always returned and are
/// never requested explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeField {
    /// Document bodies.
    Documents,
    /// Metadata maps.
    Metadatas,
    /// Embedding vectors.
    Embeddings,
    /// Relevance distances (semantic queries).
    Distances,
    /// Source URIs.
    Uris,
    /// Auxiliary payloads.
    Data,
}

/// Set of fields to project on a read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Include(Vec<IncludeField>);

impl Include {
    /// Empty projection: ids only.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Metadata only; the usual projection for ranking passes.
    pub fn metadata() -> Self {
        Self(vec![IncludeField::Metadatas])
    }

    /// Documents plus metadata; the usual projection for content fetches.
    pub fn content() -> Self {
        Self(vec![IncludeField::Documents, IncludeField::Metadatas])
    }

    /// Projection over an explicit field list.
    pub fn fields(fields: Vec<IncludeField>) -> Self {
        Self(fields)
    }

    /// Whether a field is requested.
    pub fn contains(&self, field: IncludeField) -> bool {
        self.0.contains(&field)
    }

    /// The requested fields.
    pub fn as_slice(&self) -> &[IncludeField] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Include, IncludeField};
    use pretty_assertions::assert_eq;

    #[test]
    fn presets_project_expected_fields() {
        assert!(Include::none().as_slice().is_empty());
        assert!(Include::metadata().contains(IncludeField::Metadatas));
        assert!(!Include::metadata().contains(IncludeField::Documents));
        let content = Include::content();
        assert!(content.contains(IncludeField::Documents));
        assert!(content.contains(IncludeField::Metadatas));
    }

    #[test]
    fn include_field_serializes_snake_case() {
        let json = serde_json::to_string(&IncludeField::Metadatas).expect("serialize");
        assert_eq!(json, "\"metadatas\"");
    }
}
