use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::embedders::hashed::HashEmbedder;
use super::embedding::{Embedder, DEFAULT_EMBEDDING_DIM};
use super::error::MemoryError;
use super::index::VectorIndex;
use super::indexes::in_memory::InMemoryIndex;
use super::store::MemoryStore;
use super::types::{MemoryKind, MemoryRecord, RememberRequest};

/// Recent-window size used when none is configured.
pub const DEFAULT_SESSION_WINDOW: usize = 20;

/// Hex characters kept from the identity digest.
const ID_WIDTH: usize = 16;

/// How record ids are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScheme {
    /// Hash of text, kind and the current durable-map size. Identical text and
    /// kind remembered at the same store size get the same id, and the later
    /// record replaces the earlier one in the durable map and the index.
    #[default]
    StoreSize,
    /// Hash of text, kind and a per-manager counter that only moves forward.
    /// Ids never repeat within one manager.
    Sequence,
}

/// Memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Capacity of the recent window.
    pub session_window: usize,
    /// Dimension of the default hashed embedder.
    pub embedding_dim: usize,
    pub identity: IdentityScheme,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            session_window: DEFAULT_SESSION_WINDOW,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            identity: IdentityScheme::StoreSize,
        }
    }
}

impl MemoryConfig {
    pub fn with_session_window(mut self, window: usize) -> Self {
        self.session_window = window;
        self
    }

    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn with_identity(mut self, identity: IdentityScheme) -> Self {
        self.identity = identity;
        self
    }
}

/// Everything a `remember` has to write. Guarded by one lock so readers never
/// see an index entry whose record is not yet in the durable map.
struct MemoryState {
    store: MemoryStore,
    index: Box<dyn VectorIndex>,
    sequence: u64,
}

/// Memory facade. Wires together an embedder, a vector index and the record
/// store behind `remember` / `recall`. Records leave only as clones.
pub struct MemoryManager {
    embedder: Box<dyn Embedder>,
    state: RwLock<MemoryState>,
    config: MemoryConfig,
}

impl MemoryManager {
    /// Hashed embedder plus in-process index, sized from `config`.
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            embedder: Box::new(HashEmbedder::new(config.embedding_dim)),
            state: RwLock::new(MemoryState {
                store: MemoryStore::new(config.session_window),
                index: Box::new(InMemoryIndex::new()),
                sequence: 0,
            }),
            config,
        }
    }

    /// Swap the vector index. Call before the first `remember`; entries in the
    /// previous index are dropped.
    pub fn with_index(mut self, index: impl VectorIndex + 'static) -> Self {
        self.state.get_mut().index = Box::new(index);
        self
    }

    pub fn with_embedder(mut self, embedder: impl Embedder + 'static) -> Self {
        self.embedder = Box::new(embedder);
        self
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Store a new record: assign an id, index its embedding, and append it to
    /// the recent window and durable map. Returns a copy of what was stored.
    pub async fn remember(&self, request: RememberRequest) -> Result<MemoryRecord, MemoryError> {
        let embedding = self.embedder.embed(&request.text).await?;

        let mut state = self.state.write().await;
        let salt = match self.config.identity {
            IdentityScheme::StoreSize => state.store.len() as u64,
            IdentityScheme::Sequence => {
                let next = state.sequence;
                state.sequence += 1;
                next
            }
        };

        let record = MemoryRecord {
            id: memory_id(&request.text, &request.kind, salt),
            text: request.text,
            kind: request.kind,
            emotional_context: request.emotional_context,
            created_at: Utc::now(),
            metadata: request.metadata,
        };

        // Index first: a failing backend leaves the store untouched.
        state
            .index
            .upsert(&record.id, embedding, record.index_metadata())
            .await?;
        state.store.append(record.clone());

        info!(
            id = %record.id,
            kind = %record.kind,
            emotion = %record.emotional_context,
            stored = state.store.len(),
            "remembered memory record"
        );
        Ok(record)
    }

    /// Up to `top_k` records most similar to `query`, best first. Index keys
    /// with no durable record are skipped, never reported.
    pub async fn recall(&self, query: &str, top_k: usize) -> Result<Vec<MemoryRecord>, MemoryError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;

        let state = self.state.read().await;
        let matches = state.index.query(&embedding, top_k).await?;

        let mut records = Vec::with_capacity(matches.len());
        for hit in matches {
            match state.store.get(&hit.key) {
                Some(record) => records.push(record.clone()),
                None => debug!(key = %hit.key, "dropping index hit with no stored record"),
            }
        }

        debug!(top_k, returned = records.len(), "recall complete");
        Ok(records)
    }

    /// The recent window, oldest first.
    pub async fn recent(&self) -> Vec<MemoryRecord> {
        self.state.read().await.store.recent().cloned().collect()
    }

    /// Durable lookup by id.
    pub async fn get(&self, id: &str) -> Option<MemoryRecord> {
        self.state.read().await.store.get(id).cloned()
    }

    /// Number of distinct records in the durable map.
    pub async fn len(&self) -> usize {
        self.state.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.store.is_empty()
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

fn memory_id(text: &str, kind: &MemoryKind, salt: u64) -> String {
    let digest = Sha256::digest(format!("{text}|{kind}|{salt}").as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ID_WIDTH);
    id
}
