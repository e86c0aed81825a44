//! In-memory record store enforcing identity and referential integrity.

use crate::error::MemoryError;
use crate::model::{Edge, MemoryRecord, Metadata, TIMESTAMP_KEY};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

/// Records keyed by id, kept in insertion order.
///
/// Vector, metadata and edges live in one entry per id, so the three
/// projections can never disagree on their key sets.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: IndexMap<Uuid, MemoryRecord>,
    /// Vector length shared by every record; set by the first insert unless pinned.
    dimension: Option<usize>,
}

impl RecordStore {
    /// Create an empty store that learns its dimension from the first record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a fixed vector dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            records: IndexMap::new(),
            dimension: Some(dimension),
        }
    }

    /// Rebuild a store from records already known to be consistent.
    pub(crate) fn from_parts(
        records: IndexMap<Uuid, MemoryRecord>,
        dimension: Option<usize>,
    ) -> Self {
        Self { records, dimension }
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<&MemoryRecord> {
        self.records.get(id)
    }

    /// Iterate records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.values()
    }

    /// Fail unless `actual` matches the established dimension.
    pub(crate) fn check_dimension(&self, actual: usize) -> Result<(), MemoryError> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(MemoryError::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }

    /// Insert a new record and return its generated id.
    ///
    /// A `timestamp` is injected when the metadata lacks one. Nothing is
    /// changed when the vector or metadata is rejected.
    pub fn add_item(
        &mut self,
        vector: Vec<f32>,
        mut metadata: Metadata,
    ) -> Result<Uuid, MemoryError> {
        self.check_dimension(vector.len())?;
        check_finite(&vector)?;
        metadata.validate()?;
        if !metadata.contains_key(TIMESTAMP_KEY) {
            metadata.insert(TIMESTAMP_KEY, now_timestamp());
        }

        let mut id = Uuid::new_v4();
        while self.records.contains_key(&id) {
            id = Uuid::new_v4();
        }

        self.dimension.get_or_insert(vector.len());
        self.records.insert(
            id,
            MemoryRecord {
                id,
                vector,
                metadata,
                connections: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Append an edge unless the same `(to, relation)` pair already exists.
    ///
    /// Returns whether a new edge was recorded.
    pub fn add_connection(
        &mut self,
        from: Uuid,
        to: Uuid,
        relation: &str,
    ) -> Result<bool, MemoryError> {
        if !self.records.contains_key(&to) {
            return Err(MemoryError::NotFound(to));
        }
        let record = self
            .records
            .get_mut(&from)
            .ok_or(MemoryError::NotFound(from))?;
        let edge = Edge {
            to,
            relation: relation.to_string(),
        };
        if record.connections.contains(&edge) {
            return Ok(false);
        }
        record.connections.push(edge);
        Ok(true)
    }
}

/// Reject vectors with NaN or infinite components.
pub(crate) fn check_finite(vector: &[f32]) -> Result<(), MemoryError> {
    match vector.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(MemoryError::InvalidVector(format!(
            "component {index} is {}",
            vector[index]
        ))),
        None => Ok(()),
    }
}

/// Current time as an RFC 3339 string with fixed precision, so lexical and
/// chronological order agree.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::model::{Edge, Metadata};
    use crate::MemoryError;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn add_item_assigns_unique_ids() {
        let mut store = RecordStore::new();
        let ids = (0..50)
            .map(|i| {
                store
                    .add_item(vec![i as f32, 1.0], Metadata::new())
                    .expect("add")
            })
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn add_item_injects_timestamp_when_missing() {
        let mut store = RecordStore::new();
        let id = store.add_item(vec![1.0], Metadata::new()).expect("add");
        let record = store.get(&id).expect("record");
        assert!(record.metadata.timestamp().is_some());
        assert!(record.connections.is_empty());
    }

    #[test]
    fn add_item_keeps_caller_timestamp() {
        let mut store = RecordStore::new();
        let metadata = Metadata::new().with("timestamp", "2024-01-01T00:00:00Z");
        let id = store.add_item(vec![1.0], metadata).expect("add");
        assert_eq!(
            store.get(&id).expect("record").metadata.timestamp(),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn first_record_establishes_dimension() {
        let mut store = RecordStore::new();
        assert_eq!(store.dimension(), None);
        store.add_item(vec![1.0, 2.0, 3.0], Metadata::new()).expect("add");
        assert_eq!(store.dimension(), Some(3));

        let err = store
            .add_item(vec![1.0, 2.0], Metadata::new())
            .expect_err("mismatch");
        assert!(matches!(
            err,
            MemoryError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn pinned_dimension_rejects_first_record() {
        let mut store = RecordStore::with_dimension(4);
        let err = store.add_item(vec![1.0], Metadata::new()).expect_err("pinned");
        assert!(matches!(err, MemoryError::DimensionMismatch { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_metadata_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        let metadata = Metadata::new().with("tags", "not-a-list");
        let err = store.add_item(vec![1.0], metadata).expect_err("invalid");
        assert!(matches!(err, MemoryError::InvalidMetadata(_)));
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn non_finite_vector_is_rejected() {
        let mut store = RecordStore::new();
        store.add_item(vec![1.0, 0.0], Metadata::new()).expect("add");
        for vector in [vec![f32::NAN, 1.0], vec![1.0, f32::INFINITY]] {
            let err = store.add_item(vector, Metadata::new()).expect_err("non-finite");
            assert!(matches!(err, MemoryError::InvalidVector(_)));
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn non_finite_metadata_number_is_rejected() {
        let mut store = RecordStore::new();
        for weight in [f64::INFINITY, f64::NAN] {
            let metadata = Metadata::new().with("weight", weight);
            let err = store.add_item(vec![1.0], metadata).expect_err("non-finite");
            assert!(matches!(err, MemoryError::InvalidMetadata(_)));
        }
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn connection_to_missing_target_is_rejected() {
        let mut store = RecordStore::new();
        let a = store.add_item(vec![1.0], Metadata::new()).expect("add");
        let missing = Uuid::new_v4();
        let err = store
            .add_connection(a, missing, "related")
            .expect_err("missing");
        assert!(matches!(err, MemoryError::NotFound(id) if id == missing));
        assert!(store.get(&a).expect("record").connections.is_empty());
    }

    #[test]
    fn connection_from_missing_source_is_rejected() {
        let mut store = RecordStore::new();
        let b = store.add_item(vec![1.0], Metadata::new()).expect("add");
        let missing = Uuid::new_v4();
        let err = store
            .add_connection(missing, b, "related")
            .expect_err("missing");
        assert!(matches!(err, MemoryError::NotFound(id) if id == missing));
    }

    #[test]
    fn duplicate_connection_is_a_no_op() {
        let mut store = RecordStore::new();
        let a = store.add_item(vec![1.0], Metadata::new()).expect("add a");
        let b = store.add_item(vec![1.0], Metadata::new()).expect("add b");

        assert!(store.add_connection(a, b, "cites").expect("first"));
        assert!(!store.add_connection(a, b, "cites").expect("second"));
        assert!(store.add_connection(a, b, "extends").expect("other relation"));

        assert_eq!(
            store.get(&a).expect("record").connections,
            vec![
                Edge {
                    to: b,
                    relation: "cites".to_string()
                },
                Edge {
                    to: b,
                    relation: "extends".to_string()
                },
            ]
        );
    }
}
