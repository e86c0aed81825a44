//! Whole-store JSON snapshots with atomic replace.
//!
//! The snapshot holds three co-indexed maps (`vectors`, `metadata`,
//! `connections`) keyed by record id. Every save rewrites the full file, which
//! bounds practical store size; incremental logging is deliberately absent.

use crate::error::MemoryError;
use crate::model::{Edge, MemoryRecord, Metadata};
use crate::store::RecordStore;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default snapshot filename inside the storage root.
pub const DEFAULT_SNAPSHOT_FILE: &str = "vectors.json";

/// Serialized form of a record store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub vectors: IndexMap<Uuid, Vec<f32>>,
    pub metadata: IndexMap<Uuid, Metadata>,
    pub connections: IndexMap<Uuid, Vec<Edge>>,
}

/// Borrowed view used when saving, so a save never clones the store.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    vectors: IndexMap<Uuid, &'a [f32]>,
    metadata: IndexMap<Uuid, &'a Metadata>,
    connections: IndexMap<Uuid, &'a [Edge]>,
}

impl<'a> SnapshotRef<'a> {
    fn new(store: &'a RecordStore) -> Self {
        let mut view = Self {
            vectors: IndexMap::with_capacity(store.len()),
            metadata: IndexMap::with_capacity(store.len()),
            connections: IndexMap::with_capacity(store.len()),
        };
        for record in store.records() {
            view.vectors.insert(record.id, &record.vector);
            view.metadata.insert(record.id, &record.metadata);
            view.connections.insert(record.id, &record.connections);
        }
        view
    }
}

impl Snapshot {
    /// Capture an owned snapshot of the store.
    pub fn from_store(store: &RecordStore) -> Self {
        let mut snapshot = Self::default();
        for record in store.records() {
            snapshot.vectors.insert(record.id, record.vector.clone());
            snapshot.metadata.insert(record.id, record.metadata.clone());
            snapshot
                .connections
                .insert(record.id, record.connections.clone());
        }
        snapshot
    }

    /// Rebuild a store, rejecting snapshots that break store invariants.
    ///
    /// Vectors of differing lengths make the snapshot corrupt. A consistent
    /// snapshot whose dimension differs from `pinned` is a `DimensionMismatch`.
    pub fn into_store(self, pinned: Option<usize>) -> Result<RecordStore, MemoryError> {
        let Snapshot {
            vectors,
            mut metadata,
            mut connections,
        } = self;
        if vectors.len() != metadata.len() || vectors.len() != connections.len() {
            return Err(MemoryError::CorruptSnapshot(format!(
                "key sets differ (vectors={}, metadata={}, connections={})",
                vectors.len(),
                metadata.len(),
                connections.len()
            )));
        }

        let mut found = None;
        let mut records = IndexMap::with_capacity(vectors.len());
        for (id, vector) in vectors {
            let expected = *found.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(MemoryError::CorruptSnapshot(format!(
                    "vector for {id} has length {}, expected {expected}",
                    vector.len()
                )));
            }
            let record_metadata = metadata.swap_remove(&id).ok_or_else(|| {
                MemoryError::CorruptSnapshot(format!("metadata missing for {id}"))
            })?;
            record_metadata.validate()?;
            let edges = connections.swap_remove(&id).ok_or_else(|| {
                MemoryError::CorruptSnapshot(format!("connections missing for {id}"))
            })?;
            records.insert(
                id,
                MemoryRecord {
                    id,
                    vector,
                    metadata: record_metadata,
                    connections: edges,
                },
            );
        }

        for record in records.values() {
            if let Some(edge) = record
                .connections
                .iter()
                .find(|edge| !records.contains_key(&edge.to))
            {
                return Err(MemoryError::CorruptSnapshot(format!(
                    "edge {} -> {} targets a missing record",
                    record.id, edge.to
                )));
            }
        }

        if let (Some(expected), Some(actual)) = (pinned, found)
            && expected != actual
        {
            return Err(MemoryError::DimensionMismatch { expected, actual });
        }
        Ok(RecordStore::from_parts(records, pinned.or(found)))
    }
}

/// Location of the durable snapshot and its staging file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Snapshot stored at `root/file_name`.
    pub fn new(root: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: root.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path to the staging file written before the atomic rename.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the snapshot, returning None when no snapshot exists yet.
    pub fn load(&self) -> Result<Option<Snapshot>, MemoryError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        debug!(
            "read snapshot (path={}, records={})",
            self.path.display(),
            snapshot.vectors.len()
        );
        Ok(Some(snapshot))
    }

    /// Rewrite the snapshot atomically.
    ///
    /// The staging file is fully written and synced before it replaces the
    /// previous snapshot, so a crash leaves either the old or the new file.
    pub fn save(&self, store: &RecordStore) -> Result<(), MemoryError> {
        let temp_path = self.temp_path();
        let payload = serde_json::to_vec(&SnapshotRef::new(store))?;
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        std::fs::rename(&temp_path, &self.path)?;
        sync_parent(&self.path)?;
        debug!(
            "wrote snapshot (path={}, records={}, bytes={})",
            self.path.display(),
            store.len(),
            payload.len()
        );
        Ok(())
    }
}

/// Persist the rename itself by syncing the containing directory.
#[cfg(unix)]
fn sync_parent(path: &Path) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent() {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> Result<(), MemoryError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Snapshot, SnapshotFile};
    use crate::model::{Edge, Metadata};
    use crate::store::RecordStore;
    use crate::MemoryError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_store() -> (RecordStore, Uuid, Uuid) {
        let mut store = RecordStore::new();
        let a = store
            .add_item(
                vec![1.0, 0.5],
                Metadata::new()
                    .with("text", "first")
                    .with("tags", vec!["x".to_string()]),
            )
            .expect("a");
        let b = store
            .add_item(vec![0.25, -1.0], Metadata::new().with("weight", 3.5))
            .expect("b");
        store.add_connection(a, b, "related").expect("link");
        store.add_connection(b, a, "back").expect("link");
        (store, a, b)
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().expect("tempdir");
        let file = SnapshotFile::new(temp.path(), "vectors.json");
        let (store, a, b) = sample_store();

        file.save(&store).expect("save");
        let snapshot = file.load().expect("load").expect("snapshot");
        assert_eq!(snapshot, Snapshot::from_store(&store));

        let restored = snapshot.into_store(None).expect("restore");
        assert_eq!(restored.dimension(), Some(2));
        assert_eq!(restored.get(&a), store.get(&a));
        assert_eq!(restored.get(&b), store.get(&b));
        assert!(!temp.path().join("vectors.json.tmp").exists());
    }

    #[test]
    fn snapshot_layout_uses_three_maps() {
        let (store, a, b) = sample_store();
        let value = serde_json::to_value(Snapshot::from_store(&store)).expect("serialize");
        assert_eq!(
            value["connections"][a.to_string()],
            json!([{ "to": b.to_string(), "type": "related" }])
        );
        assert_eq!(value["vectors"][b.to_string()], json!([0.25, -1.0]));
        assert_eq!(value["metadata"][a.to_string()]["text"], json!("first"));
    }

    #[test]
    fn load_missing_file_is_none() {
        let temp = tempdir().expect("tempdir");
        let file = SnapshotFile::new(temp.path(), "vectors.json");
        assert!(file.load().expect("load").is_none());
    }

    #[test]
    fn load_truncated_file_fails() {
        let temp = tempdir().expect("tempdir");
        let file = SnapshotFile::new(temp.path(), "vectors.json");
        std::fs::write(file.path(), "{\"vectors\": {").expect("write");
        assert!(matches!(file.load(), Err(MemoryError::Serde(_))));
    }

    #[test]
    fn mismatched_key_sets_are_corrupt() {
        let (store, a, _) = sample_store();
        let mut snapshot = Snapshot::from_store(&store);
        snapshot.metadata.swap_remove(&a);
        assert!(matches!(
            snapshot.into_store(None),
            Err(MemoryError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn dangling_edges_are_corrupt() {
        let (store, a, _) = sample_store();
        let mut snapshot = Snapshot::from_store(&store);
        snapshot
            .connections
            .get_mut(&a)
            .expect("edges")
            .push(Edge {
                to: Uuid::new_v4(),
                relation: "ghost".to_string(),
            });
        assert!(matches!(
            snapshot.into_store(None),
            Err(MemoryError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn inconsistent_dimensions_are_corrupt() {
        let (store, a, _) = sample_store();
        let mut snapshot = Snapshot::from_store(&store);
        snapshot.vectors.insert(a, vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            snapshot.clone().into_store(None),
            Err(MemoryError::CorruptSnapshot(_))
        ));
        assert!(matches!(
            snapshot.into_store(Some(2)),
            Err(MemoryError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn consistent_snapshot_conflicting_with_pin_is_a_mismatch() {
        let (store, _, _) = sample_store();
        assert!(matches!(
            Snapshot::from_store(&store).into_store(Some(3)),
            Err(MemoryError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn pinned_dimension_applies_to_empty_snapshot() {
        let store = Snapshot::default().into_store(Some(8)).expect("restore");
        assert!(store.is_empty());
        assert_eq!(store.dimension(), Some(8));
    }
}
