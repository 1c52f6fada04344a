use async_trait::async_trait;

use super::error::MemoryError;
use super::types::{Metadata, VectorMatch};

/// Nearest-neighbor backend. In-process map, Qdrant, whatever: implement
/// this and hand it to the manager. The manager owns identity and record
/// lifecycle; the index only stores vectors and answers similarity queries.
///
/// There is no delete. An entry can only be replaced by upserting its key again.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the entry for `key`. Dimension consistency is the
    /// caller's job.
    async fn upsert(
        &mut self,
        key: &str,
        vector: Vec<f64>,
        metadata: Metadata,
    ) -> Result<(), MemoryError>;

    /// Up to `top_k` entries ranked by descending cosine similarity.
    async fn query(&self, vector: &[f64], top_k: usize) -> Result<Vec<VectorMatch>, MemoryError>;

    /// Number of stored entries.
    async fn len(&self) -> Result<usize, MemoryError>;
}

/// Cosine similarity of two vectors.
///
/// Returns 0.0 rather than failing when the lengths differ, either vector is
/// empty, or either norm is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
