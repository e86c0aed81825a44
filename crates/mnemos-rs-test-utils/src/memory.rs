use async_trait::async_trait;
use mnemos_rs_memory::{
    FileMemoryProvider, MemoryError, MemoryProvider, MemoryStoreOptions, MemorySummary, Metadata,
    SearchHit, Subgraph,
};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Open a file-backed provider under `root`, pinned to `dimension`.
pub fn open_memory(root: &Path, dimension: usize) -> Arc<FileMemoryProvider> {
    let options = MemoryStoreOptions {
        dimension: Some(dimension),
        ..MemoryStoreOptions::default()
    };
    Arc::new(FileMemoryProvider::with_options(root, options).expect("open memory"))
}

/// Memory provider returning canned hits and recording the last requested page.
#[derive(Default)]
pub struct StubMemory {
    hits: Vec<SearchHit>,
    last_top_k: Mutex<Option<usize>>,
    last_page: Mutex<Option<(usize, usize)>>,
}

impl StubMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn last_top_k(&self) -> Option<usize> {
        *self.last_top_k.lock()
    }

    pub fn last_page(&self) -> Option<(usize, usize)> {
        *self.last_page.lock()
    }
}

#[async_trait]
impl MemoryProvider for StubMemory {
    async fn add_item(&self, _vector: Vec<f32>, _metadata: Metadata) -> Result<Uuid, MemoryError> {
        Ok(Uuid::new_v4())
    }

    async fn add_connection(
        &self,
        from: Uuid,
        _to: Uuid,
        _relation: &str,
    ) -> Result<(), MemoryError> {
        Err(MemoryError::NotFound(from))
    }

    async fn search(&self, _query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, MemoryError> {
        *self.last_top_k.lock() = Some(top_k);
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }

    async fn get_subgraph(&self, root: Uuid, _max_depth: usize) -> Result<Subgraph, MemoryError> {
        Err(MemoryError::NotFound(root))
    }

    async fn get_all_memories(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemorySummary>, MemoryError> {
        *self.last_page.lock() = Some((limit, offset));
        Ok(Vec::new())
    }
}
