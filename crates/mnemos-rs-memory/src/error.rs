//! Error types for memory operations.

use uuid::Uuid;

/// Errors returned by memory providers and helpers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Referenced record id is not in the store.
    #[error("memory not found: {0}")]
    NotFound(Uuid),
    /// Vector length does not match the store dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Vector contains a NaN or infinite component.
    #[error("invalid vector: {0}")]
    InvalidVector(String),
    /// Metadata carried a required field with the wrong kind of value.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    /// Snapshot decoded but violates store invariants.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
    /// The mutation was applied in memory but the snapshot save failed.
    ///
    /// `applied` carries the id of a newly added record, if any. Retry with
    /// `flush` to bring the snapshot back in line.
    #[error("mutation applied but snapshot save failed: {source}")]
    Unsaved {
        applied: Option<Uuid>,
        #[source]
        source: Box<MemoryError>,
    },
    /// Embedding provider failure.
    #[error("embedding error: {0}")]
    Embedding(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
