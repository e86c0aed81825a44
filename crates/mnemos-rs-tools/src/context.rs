//! Tool execution context.

use mnemos_rs_memory::{EmbeddingProvider, MemoryProvider};
use std::sync::Arc;

/// Fallback argument values used when a tool call omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDefaults {
    /// Results returned by recall when `top_k` is omitted.
    pub recall_k: usize,
    /// Page size for listings when `limit` is omitted.
    pub list_limit: usize,
    /// Traversal depth when `max_depth` is omitted.
    pub graph_depth: usize,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            recall_k: 5,
            list_limit: 10,
            graph_depth: 2,
        }
    }
}

/// Shared context passed to tools during execution.
///
/// Cloning is a pair of reference-count bumps.
#[derive(Clone)]
pub struct ToolContext {
    /// Memory graph backing the tools.
    pub memory: Arc<dyn MemoryProvider>,
    /// Embedder used for stored text and recall queries.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub defaults: ToolDefaults,
}

impl ToolContext {
    pub fn new(memory: Arc<dyn MemoryProvider>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            memory,
            embedder,
            defaults: ToolDefaults::default(),
        }
    }

    /// Replace the argument defaults.
    pub fn with_defaults(mut self, defaults: ToolDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}
