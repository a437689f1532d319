//! Record types returned by document-store reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as projected by a store read.
///
/// The id is always present; every other field is populated only when the
/// corresponding [`IncludeField`](crate::IncludeField) was requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord {
    /// Store-assigned record identifier.
    pub id: String,
    /// Document body, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Metadata map, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Embedding vector, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Source URI, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Opaque auxiliary payload, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl StoredRecord {
    /// Create a record carrying only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document: None,
            metadata: None,
            embedding: None,
            uri: None,
            data: None,
        }
    }

    /// Read a string-valued metadata field.
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.get(field))
            .and_then(Value::as_str)
    }
}

/// A record paired with a relevance score from a semantic query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecord {
    /// The projected record.
    pub record: StoredRecord,
    /// Relevance score, higher is more relevant.
    pub relevance: f32,
}
