//! Exhaustive cosine-similarity search.
//!
//! Every record is scored on each query, O(n·D). There is no index; this is
//! the intended ceiling for small personal stores.

use crate::error::MemoryError;
use crate::model::SearchHit;
use crate::store::{RecordStore, check_finite};

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0 when either vector has zero magnitude or the result is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    // Adding zero folds -0.0 into 0.0 so ties compare equal.
    if score.is_finite() { score + 0.0 } else { 0.0 }
}

impl RecordStore {
    /// Rank all records by similarity to `query`, best first.
    ///
    /// Equal scores keep insertion order. At most `top_k` hits are returned.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, MemoryError> {
        self.check_dimension(query.len())?;
        check_finite(query)?;
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut scored = self
            .records()
            .map(|record| (record, cosine_similarity(query, &record.vector)))
            .collect::<Vec<_>>();
        // Stable sort: ties stay in insertion order.
        scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(record, score)| SearchHit {
                id: record.id,
                score,
                metadata: record.metadata.clone(),
            })
            .collect())
    }
}
