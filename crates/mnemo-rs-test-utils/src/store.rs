//! In-memory read-only store with call recording and fault injection.

use async_trait::async_trait;
use mnemo_rs_store::{
    DocumentStore, Filter, Include, IncludeField, ScoredRecord, StoreError, StoredRecord,
    validate_top_k,
};
use parking_lot::Mutex;
use serde_json::json;

/// Which primitive operation a recorded call used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Direct fetch by ids.
    GetByIds,
    /// Metadata-filtered fetch.
    GetByFilter,
    /// Semantic similarity lookup.
    SemanticQuery,
}

/// One recorded store call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    /// Operation kind.
    pub op: OpKind,
    /// Requested ids (direct fetches only).
    pub ids: Vec<String>,
    /// Whether documents were projected.
    pub wants_documents: bool,
}

/// In-memory `DocumentStore` stub.
///
/// Semantic relevance is naive word overlap between the query and the
/// document, which is deterministic and good enough to exercise ordering.
#[derive(Default)]
pub struct StubStore {
    records: Vec<StoredRecord>,
    calls: Mutex<Vec<StoreCall>>,
    outages: Mutex<Vec<OpKind>>,
}

impl StubStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given records.
    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Add a record.
    pub fn insert(&mut self, record: StoredRecord) {
        self.records.push(record);
    }

    /// Remove a record by id, simulating a never-written category.
    pub fn remove(&mut self, id: &str) {
        self.records.retain(|record| record.id != id);
    }

    /// Make every call of the given kind fail with `Unavailable`.
    pub fn set_outage(&self, op: OpKind) {
        self.outages.lock().push(op);
    }

    /// All calls recorded so far, in dispatch order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Calls of one kind, in dispatch order.
    pub fn calls_of(&self, op: OpKind) -> Vec<StoreCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.op == op)
            .cloned()
            .collect()
    }

    fn record_call(&self, op: OpKind, ids: Vec<String>, include: &Include) {
        self.calls.lock().push(StoreCall {
            op,
            ids,
            wants_documents: include.contains(IncludeField::Documents),
        });
    }

    fn check_outage(&self, op: OpKind) -> Result<(), StoreError> {
        if self.outages.lock().contains(&op) {
            return Err(StoreError::Unavailable(format!("injected outage: {op:?}")));
        }
        Ok(())
    }

    fn project(&self, record: &StoredRecord, include: &Include) -> StoredRecord {
        let mut projected = StoredRecord::new(record.id.clone());
        if include.contains(IncludeField::Documents) {
            projected.document = record.document.clone();
        }
        if include.contains(IncludeField::Metadatas) {
            projected.metadata = record.metadata.clone();
        }
        if include.contains(IncludeField::Embeddings) {
            projected.embedding = record.embedding.clone();
        }
        if include.contains(IncludeField::Uris) {
            projected.uri = record.uri.clone();
        }
        if include.contains(IncludeField::Data) {
            projected.data = record.data.clone();
        }
        projected
    }

    fn matches(record: &StoredRecord, filter: &Filter) -> bool {
        record
            .metadata
            .as_ref()
            .is_some_and(|metadata| filter.matches(metadata))
    }
}

#[async_trait]
impl DocumentStore for StubStore {
    async fn get_by_ids(
        &self,
        ids: &[String],
        include: &Include,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.record_call(OpKind::GetByIds, ids.to_vec(), include);
        self.check_outage(OpKind::GetByIds)?;
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for id in ids {
            match self.records.iter().find(|record| &record.id == id) {
                Some(record) => found.push(self.project(record, include)),
                None => missing.push(id.clone()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(StoreError::NotFoundPartial { found, missing })
        }
    }

    async fn get_by_filter(
        &self,
        filter: &Filter,
        include: &Include,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.record_call(OpKind::GetByFilter, Vec::new(), include);
        filter.validate()?;
        self.check_outage(OpKind::GetByFilter)?;
        Ok(self
            .records
            .iter()
            .filter(|record| Self::matches(record, filter))
            .map(|record| self.project(record, include))
            .collect())
    }

    async fn semantic_query(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&Filter>,
        include: &Include,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        self.record_call(OpKind::SemanticQuery, Vec::new(), include);
        validate_top_k(top_k)?;
        if let Some(filter) = filter {
            filter.validate()?;
        }
        self.check_outage(OpKind::SemanticQuery)?;
        let query_words: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut hits: Vec<ScoredRecord> = self
            .records
            .iter()
            .filter(|record| filter.is_none_or(|filter| Self::matches(record, filter)))
            .map(|record| {
                let document = record.document.as_deref().unwrap_or("").to_lowercase();
                let overlap = query_words
                    .iter()
                    .filter(|word| document.contains(word.as_str()))
                    .count();
                ScoredRecord {
                    record: self.project(record, include),
                    relevance: overlap as f32,
                }
            })
            .collect();
        hits.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}

/// A long-term singleton record fixture.
pub fn longterm_record(id: &str, category: &str, content: &str) -> StoredRecord {
    let mut record = StoredRecord::new(id);
    record.document = Some(content.to_string());
    record.metadata = json!({
        "type": "longterm",
        "category": category,
    })
    .as_object()
    .cloned();
    record
}

/// A session record fixture.
pub fn session_record(id: &str, node_id: &str, timestamp: &str, topic: &str, content: &str) -> StoredRecord {
    let mut record = StoredRecord::new(id);
    record.document = Some(content.to_string());
    record.metadata = json!({
        "type": "session",
        "session_id": id,
        "node_id": node_id,
        "timestamp": timestamp,
        "topic": topic,
    })
    .as_object()
    .cloned();
    record
}
