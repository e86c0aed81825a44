use async_trait::async_trait;
use mnemos_rs_memory::{EmbeddingProvider, MemoryError};
use std::collections::HashMap;

/// Embedder that maps known texts to fixed vectors.
#[derive(Debug, Clone, Default)]
pub struct LookupEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl LookupEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    pub fn with(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for LookupEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| MemoryError::Embedding(format!("no vector for {text:?}")))
    }
}

/// Embedder that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn dimension(&self) -> usize {
        0
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MemoryError> {
        Err(MemoryError::Embedding("embedder offline".to_string()))
    }
}
