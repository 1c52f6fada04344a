pub mod in_memory;
#[cfg(feature = "qdrant")]
pub mod qdrant;
