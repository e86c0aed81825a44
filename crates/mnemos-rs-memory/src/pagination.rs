//! Recency-ordered listing of records.

use crate::model::{MemoryRecord, MemorySummary};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};

/// Ordering key for a record's timestamp.
///
/// RFC 3339 values compare by instant, whatever their fractional precision.
/// Anything else sorts below every parseable value, compared as text, with a
/// missing timestamp as the empty string.
fn recency_key(record: &MemoryRecord) -> (Option<DateTime<Utc>>, &str) {
    let raw = record.metadata.timestamp().unwrap_or("");
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => (Some(parsed.with_timezone(&Utc)), ""),
        Err(_) => (None, raw),
    }
}

impl RecordStore {
    /// Page through records, newest timestamp first.
    ///
    /// Equal instants keep insertion order, so repeated calls page
    /// consistently.
    pub fn page(&self, limit: usize, offset: usize) -> Vec<MemorySummary> {
        let mut records = self
            .records()
            .map(|record| (recency_key(record), record))
            .collect::<Vec<_>>();
        records.sort_by(|(a, _), (b, _)| b.cmp(a));
        records
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| MemorySummary {
                id: record.id,
                metadata: record.metadata.clone(),
                connections: record.connections.len(),
            })
            .collect()
    }
}
