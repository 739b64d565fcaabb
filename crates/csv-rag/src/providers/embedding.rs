//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use futures::future::try_join_all;
use std::borrow::Cow;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OllamaEmbedder`: Local Ollama server (all-minilm)
/// - `HashingEmbedder`: Offline feature hashing, no model required
///
/// Every vector returned by one provider has length [`EmbeddingProvider::dimensions`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, one vector per text in input order
    ///
    /// The default runs every `embed` call concurrently and fails on the first
    /// error. Callers bound the batch size.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Cut `text` down to at most `max_chars` characters on a char boundary
pub fn truncate_input(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            tracing::debug!(
                "Truncating embedding input from {} bytes to {} characters",
                text.len(),
                max_chars
            );
            Cow::Borrowed(&text[..byte_idx])
        }
        None => Cow::Borrowed(text),
    }
}
