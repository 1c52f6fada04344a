use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::memory::embedding::{Embedder, DEFAULT_EMBEDDING_DIM};
use crate::memory::error::MemoryError;

/// Characters trimmed from both edges of every token.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}',
];

/// Hashed bag-of-words embedder. No model, no network.
///
/// Each normalized token is hashed with SHA-256 and counted into one of
/// `dimensions` buckets; the counts are then L1-normalized. Distinct tokens may
/// share a bucket, which makes similarity approximate.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// `dimensions` is clamped to at least 1.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Synchronous core of `embed`. Pure function of `text`.
    pub fn embed_text(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0_f64; self.dimensions];

        for token in tokenize(text) {
            vector[bucket(&token, self.dimensions)] += 1.0;
        }

        let norm: f64 = vector.iter().map(|v| v.abs()).sum();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, MemoryError> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(EDGE_PUNCTUATION).to_lowercase())
        .filter(|token| !token.is_empty())
}

/// The digest read as one big-endian integer, reduced mod `dimensions`.
fn bucket(token: &str, dimensions: usize) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let modulus = dimensions as u128;
    let rem = digest
        .iter()
        .fold(0u128, |acc, &byte| (acc * 256 + byte as u128) % modulus);
    rem as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_punctuation_only_text_embed_to_zeros() {
        let embedder = HashEmbedder::default();
        for text in ["", "   ", "?!... ,,, ()[]{}", "\"'\""] {
            let v = embedder.embed_text(text);
            assert_eq!(v.len(), DEFAULT_EMBEDDING_DIM);
            assert!(v.iter().all(|x| *x == 0.0), "expected zero vector for {text:?}");
        }
    }

    #[test]
    fn output_is_l1_normalized() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed_text("the quick brown fox jumps over the lazy dog");
        let sum: f64 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "L1 norm was {sum}");
    }

    #[test]
    fn case_and_edge_punctuation_are_ignored() {
        let embedder = HashEmbedder::default();
        assert_eq!(embedder.embed_text("Anime!"), embedder.embed_text("anime"));
        assert_eq!(
            embedder.embed_text("(Hello), WORLD."),
            embedder.embed_text("hello world")
        );
    }

    #[test]
    fn repeated_tokens_accumulate_in_one_bucket() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed_text("echo echo echo");
        let nonzero: Vec<_> = v.iter().filter(|x| **x != 0.0).collect();
        assert_eq!(nonzero, vec![&1.0]);
    }

    #[test]
    fn zero_dimension_is_clamped() {
        let embedder = HashEmbedder::new(0);
        assert_eq!(embedder.dimensions(), 1);
        assert_eq!(embedder.embed_text("anything at all"), vec![1.0]);
    }

    #[tokio::test]
    async fn trait_embed_matches_sync_core() {
        let embedder = HashEmbedder::new(32);
        let via_trait = embedder.embed("Tell me about anime").await.unwrap();
        assert_eq!(via_trait, embedder.embed_text("Tell me about anime"));
        assert_eq!(via_trait.len(), 32);
    }
}
