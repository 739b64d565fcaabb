//! Ollama-based providers for embeddings and LLM
//!
//! Wraps the OllamaClient to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::OllamaClient;

use super::embedding::{truncate_input, EmbeddingProvider};
use super::llm::LlmProvider;

/// Ollama embedding provider using all-minilm or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
    max_input_chars: usize,
}

impl OllamaEmbedder {
    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>, embeddings: &EmbeddingConfig) -> Self {
        Self {
            client,
            dimensions: embeddings.dimensions,
            max_input_chars: embeddings.max_input_chars,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = truncate_input(text, self.max_input_chars);
        let embedding = self.client.embed(&input).await?;

        // Some models answer an empty prompt with an empty vector
        if embedding.is_empty() && input.trim().is_empty() {
            return Ok(vec![0.0; self.dimensions]);
        }

        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Expected {} dimensions, model returned {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
}

impl OllamaLlm {
    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client.generate(prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.generate_model()
    }
}

/// Combined Ollama provider that shares a single client for both embeddings and LLM
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    llm: OllamaLlm,
}

impl OllamaProvider {
    /// Create a new combined Ollama provider
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(llm, embeddings.model.clone())?);
        Ok(Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client), embeddings),
            llm: OllamaLlm::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaLlm) {
        (self.embedder, self.llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    /// Local stand-in for Ollama answering every embedding request with `reply`
    async fn embedding_server(reply: Value) -> String {
        let app = axum::Router::new().route(
            "/api/embeddings",
            axum::routing::post(move || {
                let reply = reply.clone();
                async move { axum::Json(reply) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    async fn embedder_replying(reply: Value) -> OllamaEmbedder {
        let llm = LlmConfig {
            base_url: embedding_server(reply).await,
            timeout_secs: 5,
            ..Default::default()
        };
        let embeddings = EmbeddingConfig {
            dimensions: 3,
            ..Default::default()
        };
        OllamaProvider::new(&llm, &embeddings).unwrap().split().0
    }

    #[tokio::test]
    async fn test_empty_input_with_empty_reply_is_zero_vector() {
        let embedder = embedder_replying(json!({"embedding": []})).await;
        assert_eq!(embedder.embed("").await.unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_empty_reply_for_real_text_is_error() {
        let embedder = embedder_replying(json!({"embedding": []})).await;
        assert!(matches!(
            embedder.embed("name:Alice").await,
            Err(Error::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_reply_dimensions_checked() {
        let embedder = embedder_replying(json!({"embedding": [0.5, 0.25, 1.0]})).await;
        assert_eq!(embedder.embed("name:Alice").await.unwrap(), vec![0.5, 0.25, 1.0]);

        let embedder = embedder_replying(json!({"embedding": [0.5, 0.25]})).await;
        assert!(matches!(embedder.embed("x").await, Err(Error::Embedding(_))));
    }
}
