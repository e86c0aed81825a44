//! Configuration schema for Mnemos.

use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory under the home directory holding user config and default storage.
pub const USER_DIR: &str = ".mnemos";

/// Root config for Mnemos.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MnemosConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl MnemosConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MnemosConfigBuilder {
        MnemosConfigBuilder::new()
    }
}

/// Builder for assembling a `MnemosConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MnemosConfigBuilder {
    config: MnemosConfig,
}

impl MnemosConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MnemosConfig::default(),
        }
    }

    /// Replace the memory store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the embedding configuration.
    pub fn embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.config.embedding = embedding;
        self
    }

    /// Set the storage directory.
    pub fn memory_path(mut self, path: impl Into<String>) -> Self {
        self.config.memory.path = Some(path.into());
        self
    }

    /// Finalize and return the built `MnemosConfig`.
    pub fn build(self) -> MnemosConfig {
        self.config
    }
}

/// Memory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Storage directory; defaults to `~/.mnemos/memory`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Fix the store dimension to `embedding.dimension` at open.
    #[serde(default)]
    pub pin_dimension: bool,
    #[serde(default = "default_recall_k")]
    pub recall_k: usize,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_graph_depth")]
    pub graph_depth: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            snapshot_file: default_snapshot_file(),
            pin_dimension: false,
            recall_k: default_recall_k(),
            list_limit: default_list_limit(),
            graph_depth: default_graph_depth(),
        }
    }
}

impl MemoryConfig {
    /// Resolve the storage directory, falling back to the user default.
    ///
    /// Returns None when no path is configured and no home directory exists.
    pub fn storage_root(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(PathBuf::from(path)),
            None => UserDirs::new().map(|dirs| dirs.home_dir().join(USER_DIR).join("memory")),
        }
    }
}

/// Default snapshot filename.
fn default_snapshot_file() -> String {
    "vectors.json".to_string()
}

/// Default number of memories to recall.
fn default_recall_k() -> usize {
    5
}

/// Default page size for listings.
fn default_list_limit() -> usize {
    10
}

/// Default subgraph depth.
fn default_graph_depth() -> usize {
    2
}

/// Embedding provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            dimension: default_dimension(),
        }
    }
}

/// Default embedding dimension.
fn default_dimension() -> usize {
    768
}

/// Supported embedding providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Deterministic feature-hashing embedder.
    #[default]
    Hash,
}
