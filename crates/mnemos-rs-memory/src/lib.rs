//! Persistent vector memory graph for Mnemos.
//!
//! Records pair an embedding vector with open metadata and an ordered list of
//! labeled outgoing edges. The store ranks records by cosine similarity,
//! extracts bounded subgraphs, pages through records by recency, and writes a
//! full snapshot to disk after every mutation.

pub mod embedding;
pub mod error;
pub mod graph;
pub mod model;
pub mod pagination;
pub mod provider;
pub mod search;
pub mod snapshot;
pub mod store;

/// Embedding provider interface and the default hashing embedder.
pub use embedding::{EmbeddingProvider, HashEmbedder};
/// Memory error type.
pub use error::MemoryError;
/// Record, edge, and query result models.
pub use model::{
    Edge, MemoryRecord, MemorySummary, Metadata, MetadataValue, SearchHit, Subgraph,
    SubgraphEdge,
};
/// Memory provider interface and default file implementation.
pub use provider::{FileMemoryProvider, MemoryProvider, MemoryStoreOptions};
/// Cosine similarity used by search.
pub use search::cosine_similarity;
/// Snapshot file handling.
pub use snapshot::{DEFAULT_SNAPSHOT_FILE, Snapshot, SnapshotFile};
/// In-memory record store.
pub use store::RecordStore;
