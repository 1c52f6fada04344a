pub mod embedders;
pub mod embedding;
pub mod error;
pub mod index;
pub mod indexes;
pub mod manager;
pub mod store;
pub mod types;

pub use embedders::hashed::HashEmbedder;
pub use embedding::{Embedder, DEFAULT_EMBEDDING_DIM};
pub use error::MemoryError;
pub use index::{cosine_similarity, VectorIndex};
pub use indexes::in_memory::InMemoryIndex;
#[cfg(feature = "qdrant")]
pub use indexes::qdrant::QdrantIndex;
pub use manager::{IdentityScheme, MemoryConfig, MemoryManager, DEFAULT_SESSION_WINDOW};
pub use store::MemoryStore;
pub use types::{MemoryKind, MemoryRecord, Metadata, RememberRequest, VectorMatch};
