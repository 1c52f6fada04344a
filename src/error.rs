use crate::memory::MemoryError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("personality error: {0}")]
    Personality(String),
    #[error("unknown task: {0}")]
    UnknownTask(String),
    #[error("task {name} failed: {message}")]
    Task { name: String, message: String },
}
