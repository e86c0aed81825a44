//! Embedding provider interface and a deterministic default implementation.

use crate::error::MemoryError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

#[async_trait]
/// Turns text into fixed-length vectors for storage and search.
pub trait EmbeddingProvider: Send + Sync {
    /// Length of every vector this provider produces.
    fn dimension(&self) -> usize;

    /// Embed a piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
}

/// Feature-hashing bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed with SHA-256 into a signed
/// bucket; the result is L2-normalized. Output is stable across runs and
/// platforms, so persisted vectors stay comparable with fresh queries.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Result<Self, MemoryError> {
        if dimension == 0 {
            return Err(MemoryError::Embedding(
                "dimension must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Embed synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(self.embed_text(text))
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::{EmbeddingProvider, HashEmbedder};
    use crate::search::cosine_similarity;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_zero_dimension() {
        assert!(HashEmbedder::new(0).is_err());
    }

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalized() {
        let embedder = HashEmbedder::new(64).expect("embedder");
        let a = embedder.embed("The quick brown fox").await.expect("embed");
        let b = embedder.embed("the QUICK brown fox!").await.expect("embed");
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlapping_text_scores_higher() {
        let embedder = HashEmbedder::new(256).expect("embedder");
        let query = embedder.embed_text("rust memory graph");
        let close = embedder.embed_text("a memory graph written in rust");
        let far = embedder.embed_text("weather forecast for tomorrow");
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(8).expect("embedder");
        assert_eq!(embedder.embed_text("  ... "), vec![0.0; 8]);
    }
}
