//! Result assembly: pure merge of resolved records into an ordered
//! memory context.

use crate::catalog::Category;
use crate::plan::Provenance;
use crate::session::SessionMeta;
use mnemo_rs_store::StoredRecord;
use std::collections::{BTreeMap, BTreeSet};

/// A resolved record together with the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    /// The fetched record.
    pub record: StoredRecord,
    /// The plan step that fetched it.
    pub provenance: Provenance,
}

/// What a memory entry is, for the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryLabel {
    /// One of the six singleton long-term records.
    LongTerm(Category),
    /// A session record.
    Session {
        /// Session token.
        session_id: String,
        /// Short human-readable summary.
        topic: String,
    },
    /// A record outside the catalog and session schema (freeform hits).
    Uncategorized,
}

/// One entry of the assembled memory context.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    /// Store record id.
    pub id: String,
    /// Entry label.
    pub label: EntryLabel,
    /// Document content; `None` for metadata-only results (sessions
    /// outside the hydrated recent window).
    pub content: Option<String>,
    /// The plan step that produced the entry.
    pub provenance: Provenance,
}

/// A step-local store failure the plan survived.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    /// The failing step.
    pub provenance: Provenance,
    /// Store error description.
    pub error: String,
}

/// The assembled memory context: long-term entries in catalog order,
/// then session entries in recency order, then uncategorized hits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RetrievalResult {
    /// Ordered entries; each record id appears at most once.
    pub entries: Vec<MemoryEntry>,
    /// Requested ids the store could not supply. Not a hard failure.
    pub unresolved: Vec<String>,
    /// Step-local store outages encountered during execution.
    pub failures: Vec<StepFailure>,
}

impl RetrievalResult {
    /// Entry for a record id, if resolved.
    pub fn entry(&self, id: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Whether an id was requested but not supplied.
    pub fn is_unresolved(&self, id: &str) -> bool {
        self.unresolved.iter().any(|missing| missing == id)
    }
}

/// Merge resolved records into an ordered result.
///
/// Pure: input records are cloned, never mutated. `sessions` must already
/// be in recency order.
pub fn assemble(
    resolved: &BTreeMap<String, ResolvedRecord>,
    sessions: &[SessionMeta],
    unresolved: BTreeSet<String>,
    failures: Vec<StepFailure>,
) -> RetrievalResult {
    let mut entries = Vec::new();
    let mut used: BTreeSet<&str> = BTreeSet::new();

    for category in Category::ALL {
        let id = category.record_id();
        if let Some(hit) = resolved.get(id) {
            used.insert(id);
            entries.push(MemoryEntry {
                id: id.to_string(),
                label: EntryLabel::LongTerm(category),
                content: hit.record.document.clone(),
                provenance: hit.provenance,
            });
        }
    }

    for meta in sessions {
        if let Some(hit) = resolved.get(&meta.id) {
            if !used.insert(meta.id.as_str()) {
                continue;
            }
            entries.push(MemoryEntry {
                id: meta.id.clone(),
                label: EntryLabel::Session {
                    session_id: meta.session_id.clone(),
                    topic: meta.topic.clone(),
                },
                content: hit.record.document.clone(),
                provenance: hit.provenance,
            });
        }
    }

    // Freeform semantic hits may fall outside both tiers; keep them after
    // the ordered tiers, in id order for determinism.
    for (id, hit) in resolved {
        if used.contains(id.as_str()) {
            continue;
        }
        entries.push(MemoryEntry {
            id: id.clone(),
            label: EntryLabel::Uncategorized,
            content: hit.record.document.clone(),
            provenance: hit.provenance,
        });
    }

    let unresolved = unresolved
        .into_iter()
        .filter(|id| !resolved.contains_key(id))
        .collect();

    RetrievalResult {
        entries,
        unresolved,
        failures,
    }
}
