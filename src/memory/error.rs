/// Errors surfaced by pluggable memory backends.
///
/// The in-process embedder and index never produce these; degenerate input
/// (empty text, oversized `top_k`, dangling keys) yields empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("index error: {0}")]
    Store(String),
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}
