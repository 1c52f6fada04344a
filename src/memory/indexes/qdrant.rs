use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::memory::error::MemoryError;
use crate::memory::index::VectorIndex;
use crate::memory::types::{Metadata, VectorMatch};

const KEY_FIELD: &str = "key";
const META_PREFIX: &str = "meta:";

/// Qdrant-backed vector index. Vectors and metadata live in a cosine-distance
/// collection; records themselves stay in the manager's store.
///
/// Qdrant only accepts integer or UUID point ids, so each key is hashed to a
/// `u64` and the original key rides along in the payload. Ordering among equal
/// scores is whatever Qdrant returns.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    dimensions: usize,
}

impl QdrantIndex {
    /// Connect to a Qdrant instance and ensure the collection exists.
    pub async fn new(url: &str, collection: &str, dimensions: usize) -> Result<Self, MemoryError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| MemoryError::Store(format!("failed to connect to qdrant: {e}")))?;

        let index = Self {
            client,
            collection: collection.to_string(),
            dimensions,
        };

        index.ensure_collection().await?;
        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<(), MemoryError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| MemoryError::Store(format!("failed to check collection: {e}")))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimensions as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| MemoryError::Store(format!("failed to create collection: {e}")))?;
        }

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(
        &mut self,
        key: &str,
        vector: Vec<f64>,
        metadata: Metadata,
    ) -> Result<(), MemoryError> {
        let mut fields = Map::new();
        fields.insert(KEY_FIELD.into(), Value::String(key.to_string()));
        for (name, value) in metadata {
            fields.insert(format!("{META_PREFIX}{name}"), Value::String(value));
        }
        let payload: Payload = Value::Object(fields)
            .try_into()
            .map_err(|e| MemoryError::Serialization(format!("payload: {e}")))?;

        let dense: Vec<f32> = vector.into_iter().map(|v| v as f32).collect();
        let point = PointStruct::new(point_id(key), dense, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| MemoryError::Store(format!("upsert failed: {e}")))?;

        Ok(())
    }

    async fn query(&self, vector: &[f64], top_k: usize) -> Result<Vec<VectorMatch>, MemoryError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let dense: Vec<f32> = vector.iter().map(|v| *v as f32).collect();
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, dense, top_k as u64).with_payload(true),
            )
            .await
            .map_err(|e| MemoryError::Store(format!("search failed: {e}")))?;

        Ok(results
            .result
            .into_iter()
            .map(|point| VectorMatch {
                key: extract_string(&point.payload, KEY_FIELD),
                score: f64::from(point.score),
                metadata: extract_metadata(&point.payload),
            })
            .collect())
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        let result = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| MemoryError::Store(format!("count failed: {e}")))?;

        Ok(result.result.map(|r| r.count as usize).unwrap_or(0))
    }
}

/// First eight bytes of the key's SHA-256, big-endian.
fn point_id(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn extract_string(payload: &HashMap<String, QdrantValue>, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn extract_metadata(payload: &HashMap<String, QdrantValue>) -> Metadata {
    payload
        .iter()
        .filter_map(|(field, value)| {
            let name = field.strip_prefix(META_PREFIX)?;
            let text = value.as_str()?;
            Some((name.to_string(), text.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_stable_and_distinct() {
        assert_eq!(point_id("3f2a9c0d11e4b7a6"), point_id("3f2a9c0d11e4b7a6"));
        assert_ne!(point_id("3f2a9c0d11e4b7a6"), point_id("3f2a9c0d11e4b7a7"));
    }
}
