//! Session metadata parsing and recency ranking.

use crate::catalog::{
    NODE_ID_FIELD, SESSION_ID_FIELD, SESSION_TYPE, TIMESTAMP_FIELD, TOPIC_FIELD, TYPE_FIELD,
};
use chrono::{DateTime, Utc};
use log::warn;
use mnemo_rs_store::StoredRecord;
use std::cmp::Ordering;

/// Parsed metadata of one session record.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMeta {
    /// Store record id.
    pub id: String,
    /// Session token.
    pub session_id: String,
    /// Originating workflow node.
    pub node_id: String,
    /// Raw timestamp string as stored.
    pub timestamp: String,
    /// Parsed timestamp when the raw value is RFC 3339.
    pub parsed: Option<DateTime<Utc>>,
    /// Short human-readable summary.
    pub topic: String,
}

impl SessionMeta {
    /// Parse session metadata from a projected record.
    ///
    /// Returns `None` for records that are not sessions or that are
    /// missing required schema fields; malformed records are logged and
    /// skipped rather than failing the plan.
    pub fn from_record(record: &StoredRecord) -> Option<SessionMeta> {
        if record.metadata_str(TYPE_FIELD) != Some(SESSION_TYPE) {
            return None;
        }
        let required = |field: &str| {
            let value = record.metadata_str(field);
            if value.is_none() {
                warn!(
                    "session record missing required field (id={}, field={})",
                    record.id, field
                );
            }
            value
        };
        let session_id = required(SESSION_ID_FIELD)?.to_string();
        let node_id = required(NODE_ID_FIELD)?.to_string();
        let timestamp = required(TIMESTAMP_FIELD)?.to_string();
        let topic = required(TOPIC_FIELD)?.to_string();
        let parsed = DateTime::parse_from_rfc3339(&timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc));
        Some(SessionMeta {
            id: record.id.clone(),
            session_id,
            node_id,
            timestamp,
            parsed,
            topic,
        })
    }
}

/// Recency ordering: timestamp descending, ties broken by record id
/// ascending.
///
/// Parseable and unparseable timestamps occupy disjoint strata so the
/// relation stays a strict total order: records with an RFC 3339
/// timestamp rank first, by instant; unparseable timestamps follow, in
/// lexical order. Mixing instant and lexical comparison across strata
/// would make the relation cyclic for offset timestamps.
fn recency_cmp(a: &SessionMeta, b: &SessionMeta) -> Ordering {
    let by_time = match (a.parsed, b.parsed) {
        (Some(ts_a), Some(ts_b)) => ts_b.cmp(&ts_a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.timestamp.cmp(&a.timestamp),
    };
    by_time.then_with(|| a.id.cmp(&b.id))
}

/// Stable sort of session metadata into recency order, most recent first.
pub fn rank_sessions(mut sessions: Vec<SessionMeta>) -> Vec<SessionMeta> {
    sessions.sort_by(recency_cmp);
    sessions
}

#[cfg(test)]
mod tests {
    use super::{SessionMeta, rank_sessions};
    use mnemo_rs_store::StoredRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn session_record(id: &str, timestamp: &str) -> StoredRecord {
        let mut record = StoredRecord::new(id);
        record.metadata = json!({
            "type": "session",
            "session_id": id,
            "node_id": "node-1",
            "timestamp": timestamp,
            "topic": "topic",
        })
        .as_object()
        .cloned();
        record
    }

    fn meta(id: &str, timestamp: &str) -> SessionMeta {
        SessionMeta::from_record(&session_record(id, timestamp)).expect("session meta")
    }

    #[test]
    fn non_session_and_incomplete_records_are_skipped() {
        let mut longterm = StoredRecord::new("ltm_architecture");
        longterm.metadata = json!({"type": "longterm"}).as_object().cloned();
        assert_eq!(SessionMeta::from_record(&longterm), None);

        let mut incomplete = session_record("s1", "2026-01-01T00:00:00Z");
        incomplete
            .metadata
            .as_mut()
            .expect("metadata")
            .remove("topic");
        assert_eq!(SessionMeta::from_record(&incomplete), None);
    }

    #[test]
    fn ranking_orders_by_timestamp_descending() {
        let ranked = rank_sessions(vec![
            meta("s1", "2026-02-01T10:00:00Z"),
            meta("s2", "2026-02-03T10:00:00Z"),
            meta("s3", "2026-02-02T10:00:00Z"),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s3", "s1"]);
    }

    #[test]
    fn equal_timestamps_tie_break_by_id_ascending() {
        let ranked = rank_sessions(vec![
            meta("s9", "2026-02-01T10:00:00Z"),
            meta("s1", "2026-02-01T10:00:00Z"),
            meta("s5", "2026-02-01T10:00:00Z"),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s5", "s9"]);
    }

    #[test]
    fn mixed_format_timestamps_rank_by_instant_then_lexical_stratum() {
        // Lexically "2000-..." > "1999-12-31T22" > "1999-12-31T20:00:00Z",
        // but as an instant the offset timestamp is the oldest of the two
        // parseable ones. Parseable records must rank first by instant,
        // with the unparseable one after, regardless of input order.
        let offset = meta("a", "2000-01-01T00:00:00+09:00");
        let utc = meta("b", "1999-12-31T20:00:00Z");
        let odd = meta("c", "1999-12-31T22");
        let expected = vec!["b", "a", "c"];

        let inputs = [
            vec![offset.clone(), utc.clone(), odd.clone()],
            vec![odd.clone(), offset.clone(), utc.clone()],
            vec![utc.clone(), odd.clone(), offset.clone()],
            vec![odd, utc, offset],
        ];
        for input in inputs {
            let ranked = rank_sessions(input);
            let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn ranking_is_total_over_many_interleaved_mixed_triples() {
        let mut sessions = Vec::new();
        for n in 0..16 {
            sessions.push(meta(&format!("a{n:02}"), "2000-01-01T00:00:00+09:00"));
            sessions.push(meta(&format!("b{n:02}"), "1999-12-31T20:00:00Z"));
            sessions.push(meta(&format!("c{n:02}"), "1999-12-31T22"));
        }
        let ranked = rank_sessions(sessions);
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        // The newest real instant ranks first; all parseable records
        // precede every unparseable one; ties break by id ascending.
        assert!(ids[0].starts_with('b'));
        assert!(ids[..16].iter().all(|id| id.starts_with('b')));
        assert!(ids[16..32].iter().all(|id| id.starts_with('a')));
        assert!(ids[32..].iter().all(|id| id.starts_with('c')));
        let mut sorted_within = ids[..16].to_vec();
        sorted_within.sort_unstable();
        assert_eq!(ids[..16], sorted_within[..]);
    }

    #[test]
    fn unparseable_timestamps_fall_back_to_lexical_order() {
        let ranked = rank_sessions(vec![
            meta("s1", "2026-W05-1"),
            meta("s2", "2026-W07-3"),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s1"]);
    }
}
