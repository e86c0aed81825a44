//! Memory provider interface and the file-backed store.

use crate::error::MemoryError;
use crate::model::{MemorySummary, Metadata, SearchHit, Subgraph};
use crate::snapshot::{DEFAULT_SNAPSHOT_FILE, SnapshotFile};
use crate::store::RecordStore;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
/// Memory graph operations exposed to tools and callers.
pub trait MemoryProvider: Send + Sync {
    /// Store a vector with metadata and return the new record id.
    async fn add_item(&self, vector: Vec<f32>, metadata: Metadata) -> Result<Uuid, MemoryError>;

    /// Link two existing records. Duplicate links are ignored.
    async fn add_connection(
        &self,
        from: Uuid,
        to: Uuid,
        relation: &str,
    ) -> Result<(), MemoryError>;

    /// Rank records by cosine similarity to the query.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, MemoryError>;

    /// Extract the subgraph reachable from `root` within `max_depth` hops.
    async fn get_subgraph(&self, root: Uuid, max_depth: usize) -> Result<Subgraph, MemoryError>;

    /// List records newest first.
    async fn get_all_memories(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemorySummary>, MemoryError>;
}

/// Options for opening a file-backed store.
#[derive(Debug, Clone)]
pub struct MemoryStoreOptions {
    /// Snapshot filename inside the storage root.
    pub snapshot_file: String,
    /// Fix the vector dimension up front instead of learning it from the first record.
    pub dimension: Option<usize>,
}

impl Default for MemoryStoreOptions {
    fn default() -> Self {
        Self {
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            dimension: None,
        }
    }
}

/// File-backed memory graph guarded by a single lock.
///
/// Every operation, including the snapshot write a mutation triggers, runs
/// while holding the lock, so operations are totally ordered. The lock is
/// FIFO, and nothing awaits while it is held, so a cancelled caller either
/// never started or already finished.
#[derive(Debug)]
pub struct FileMemoryProvider {
    snapshot: SnapshotFile,
    store: Mutex<RecordStore>,
}

impl FileMemoryProvider {
    /// Open the store under `root`, loading any existing snapshot.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        Self::with_options(root, MemoryStoreOptions::default())
    }

    /// Open the store with explicit options.
    ///
    /// A missing or unreadable snapshot yields an empty store. A readable
    /// snapshot whose dimension disagrees with `options.dimension` is an error,
    /// so a config change never silently discards stored memories.
    pub fn with_options(
        root: impl AsRef<Path>,
        options: MemoryStoreOptions,
    ) -> Result<Self, MemoryError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let snapshot = SnapshotFile::new(root, &options.snapshot_file);
        let store = load_store(&snapshot, options.dimension)?;
        info!(
            "initialized file memory provider (path={}, records={})",
            snapshot.path().display(),
            store.len()
        );
        Ok(Self {
            snapshot,
            store: Mutex::new(store),
        })
    }

    /// Write the current state to disk.
    ///
    /// Use this to retry after a mutation reported `MemoryError::Unsaved`.
    pub async fn flush(&self) -> Result<(), MemoryError> {
        let store = self.store.lock().await;
        self.snapshot.save(&store)
    }

    /// Flush and release the store.
    pub async fn close(self) -> Result<(), MemoryError> {
        let store = self.store.into_inner();
        self.snapshot.save(&store)?;
        info!("saved {} memories to storage", store.len());
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Vector dimension, once established.
    pub async fn dimension(&self) -> Option<usize> {
        self.store.lock().await.dimension()
    }

    pub fn snapshot_path(&self) -> &Path {
        self.snapshot.path()
    }

    /// Persist after an applied mutation, tagging failures as unsaved.
    fn persist(&self, store: &RecordStore, applied: Option<Uuid>) -> Result<(), MemoryError> {
        self.snapshot.save(store).map_err(|err| {
            warn!(
                "snapshot save failed after mutation (path={}): {err}",
                self.snapshot.path().display()
            );
            MemoryError::Unsaved {
                applied,
                source: Box::new(err),
            }
        })
    }
}

/// Load the snapshot, falling back to an empty store when it cannot be read.
fn load_store(
    snapshot: &SnapshotFile,
    dimension: Option<usize>,
) -> Result<RecordStore, MemoryError> {
    let empty = || match dimension {
        Some(dimension) => RecordStore::with_dimension(dimension),
        None => RecordStore::new(),
    };
    let loaded = match snapshot.load() {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            info!(
                "no existing memory found, creating new storage (path={})",
                snapshot.path().display()
            );
            return Ok(empty());
        }
        Err(err) => {
            warn!(
                "failed to load memory snapshot, starting empty (path={}): {err}",
                snapshot.path().display()
            );
            return Ok(empty());
        }
    };
    match loaded.into_store(dimension) {
        Ok(store) => Ok(store),
        Err(err @ MemoryError::DimensionMismatch { .. }) if dimension.is_some() => Err(err),
        Err(err) => {
            warn!(
                "memory snapshot is invalid, starting empty (path={}): {err}",
                snapshot.path().display()
            );
            Ok(empty())
        }
    }
}

#[async_trait]
impl MemoryProvider for FileMemoryProvider {
    async fn add_item(&self, vector: Vec<f32>, metadata: Metadata) -> Result<Uuid, MemoryError> {
        let mut store = self.store.lock().await;
        let dim = vector.len();
        let id = store.add_item(vector, metadata)?;
        self.persist(&store, Some(id))?;
        debug!("stored memory (id={id}, dim={dim}, total={})", store.len());
        Ok(id)
    }

    async fn add_connection(
        &self,
        from: Uuid,
        to: Uuid,
        relation: &str,
    ) -> Result<(), MemoryError> {
        let mut store = self.store.lock().await;
        let added = store.add_connection(from, to, relation)?;
        self.persist(&store, None)?;
        debug!("connected memories (from={from}, to={to}, relation={relation}, added={added})");
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, MemoryError> {
        let store = self.store.lock().await;
        let hits = store.search(query, top_k)?;
        debug!(
            "searched memories (top_k={top_k}, scanned={}, returned={})",
            store.len(),
            hits.len()
        );
        Ok(hits)
    }

    async fn get_subgraph(&self, root: Uuid, max_depth: usize) -> Result<Subgraph, MemoryError> {
        let store = self.store.lock().await;
        let graph = store.subgraph(root, max_depth)?;
        debug!(
            "extracted subgraph (root={root}, max_depth={max_depth}, nodes={}, edges={})",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    async fn get_all_memories(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemorySummary>, MemoryError> {
        let store = self.store.lock().await;
        let page = store.page(limit, offset);
        debug!(
            "listed memories (limit={limit}, offset={offset}, returned={})",
            page.len()
        );
        Ok(page)
    }
}
