use async_trait::async_trait;

use super::error::MemoryError;

/// Embedding dimension used when none is configured.
pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// Embedding trait. Hashed bag-of-words, local model, remote API, whatever.
/// Implementations must be deterministic: the same text always maps to the
/// same vector, or recall ordering becomes unstable.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, MemoryError>;

    /// Dimensionality of the vectors this embedder produces.
    fn dimensions(&self) -> usize;
}
