use std::collections::HashMap;

use async_trait::async_trait;

use crate::memory::error::MemoryError;
use crate::memory::index::{cosine_similarity, VectorIndex};
use crate::memory::types::{Metadata, VectorMatch};

struct Entry {
    key: String,
    vector: Vec<f64>,
    metadata: Metadata,
}

/// Process-local vector index. Brute-force cosine scan over every entry.
///
/// Entries are kept in first-insertion order and replacing a key keeps its
/// slot, so equal scores always rank in the order keys were first inserted.
/// Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryIndex {
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous form of `VectorIndex::upsert`.
    pub fn insert(&mut self, key: &str, vector: Vec<f64>, metadata: Metadata) {
        match self.positions.get(key) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.vector = vector;
                entry.metadata = metadata;
            }
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push(Entry {
                    key: key.to_string(),
                    vector,
                    metadata,
                });
            }
        }
    }

    /// Synchronous form of `VectorIndex::query`.
    pub fn search(&self, vector: &[f64], top_k: usize) -> Vec<VectorMatch> {
        if top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (slot, cosine_similarity(vector, &entry.vector)))
            .collect();

        // Stable sort: ties keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(slot, score)| {
                let entry = &self.entries[slot];
                VectorMatch {
                    key: entry.key.clone(),
                    score,
                    metadata: entry.metadata.clone(),
                }
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn upsert(
        &mut self,
        key: &str,
        vector: Vec<f64>,
        metadata: Metadata,
    ) -> Result<(), MemoryError> {
        self.insert(key, vector, metadata);
        Ok(())
    }

    async fn query(&self, vector: &[f64], top_k: usize) -> Result<Vec<VectorMatch>, MemoryError> {
        Ok(self.search(vector, top_k))
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(tag: &str) -> Metadata {
        Metadata::from([("tag".to_string(), tag.to_string())])
    }

    #[test]
    fn ranks_by_descending_similarity() {
        let mut index = InMemoryIndex::new();
        index.insert("far", vec![0.0, 1.0], meta("far"));
        index.insert("near", vec![1.0, 0.1], meta("near"));
        index.insert("mid", vec![1.0, 1.0], meta("mid"));

        let hits = index.search(&[1.0, 0.0], 3);
        let keys: Vec<_> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, ["near", "mid", "far"]);
        assert_eq!(hits[0].metadata["tag"], "near");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut index = InMemoryIndex::new();
        for key in ["a", "b", "c", "d"] {
            index.insert(key, vec![0.5, 0.5], Metadata::new());
        }
        let keys: Vec<_> = index
            .search(&[1.0, 1.0], 4)
            .into_iter()
            .map(|h| h.key)
            .collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut index = InMemoryIndex::new();
        index.insert("a", vec![1.0, 0.0], meta("old"));
        index.insert("b", vec![1.0, 0.0], meta("b"));
        index.insert("a", vec![1.0, 0.0], meta("new"));

        assert_eq!(index.count(), 2);
        let hits = index.search(&[1.0, 0.0], 5);
        assert_eq!(hits[0].key, "a");
        assert_eq!(hits[0].metadata["tag"], "new");
        assert_eq!(hits[1].key, "b");
    }

    #[test]
    fn result_length_is_bounded() {
        let mut index = InMemoryIndex::new();
        assert!(index.search(&[1.0], 3).is_empty());

        index.insert("only", vec![1.0], Metadata::new());
        assert_eq!(index.search(&[1.0], 10).len(), 1);
        assert!(index.search(&[1.0], 0).is_empty());
    }

    #[test]
    fn zero_query_scores_zero_everywhere() {
        let mut index = InMemoryIndex::new();
        index.insert("x", vec![0.2, 0.8], Metadata::new());
        index.insert("y", vec![0.9, 0.1], Metadata::new());

        let hits = index.search(&[0.0, 0.0], 2);
        assert!(hits.iter().all(|h| h.score == 0.0));
        assert_eq!(hits[0].key, "x");
    }

    #[tokio::test]
    async fn trait_methods_delegate() {
        let mut index = InMemoryIndex::new();
        VectorIndex::upsert(&mut index, "k", vec![1.0, 0.0], Metadata::new())
            .await
            .unwrap();
        assert_eq!(VectorIndex::len(&index).await.unwrap(), 1);
        let hits = index.query(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].key, "k");
    }
}
