//! Provider abstractions for embeddings and LLM
//!
//! The engine only sees the traits; which backend sits behind them is decided once
//! at startup from [`RagConfig`].

pub mod embedding;
pub mod hashing;
pub mod llm;
pub mod ollama;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, RagConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use hashing::HashingEmbedder;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};

/// Construct the configured embedding and LLM providers
pub fn from_config(
    config: &RagConfig,
) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn LlmProvider>)> {
    let (ollama_embedder, llm) = OllamaProvider::new(&config.llm, &config.embeddings)?.split();

    let embedder: Arc<dyn EmbeddingProvider> = match config.embeddings.backend {
        EmbeddingBackend::Ollama => {
            tracing::info!(
                "Using Ollama embeddings ({}, {} dims)",
                config.embeddings.model,
                config.embeddings.dimensions
            );
            Arc::new(ollama_embedder)
        }
        EmbeddingBackend::Hashing => {
            tracing::info!(
                "Using hashing embeddings ({} dims)",
                config.embeddings.dimensions
            );
            Arc::new(HashingEmbedder::from_config(&config.embeddings)?)
        }
    };

    Ok((embedder, Arc::new(llm)))
}
