//! Offline feature-hashing embedder
//!
//! Each lower-cased alphanumeric token is hashed with SHA-256; the first four digest
//! bytes pick a bucket and the fifth picks a sign. The vector is the signed bucket
//! count, unnormalized. Useful when no model server is reachable and in tests.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::{truncate_input, EmbeddingProvider};

/// Deterministic bag-of-tokens embedder
pub struct HashingEmbedder {
    dimensions: usize,
    max_input_chars: usize,
}

impl HashingEmbedder {
    /// Create a new hashing embedder
    pub fn new(dimensions: usize, max_input_chars: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::Config(
                "Hashing embedder needs at least one dimension".to_string(),
            ));
        }
        Ok(Self {
            dimensions,
            max_input_chars,
        })
    }

    /// Create from embedding config
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        Self::new(config.dimensions, config.max_input_chars)
    }

    /// Embed synchronously
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let input = truncate_input(text, self.max_input_chars);
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(&input) {
            let digest = Sha256::digest(token.as_bytes());
            let bucket = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
                % self.dimensions;
            let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
