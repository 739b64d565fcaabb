//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Retrieval defaults
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Embedding backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama embeddings endpoint
    #[default]
    Ollama,
    /// Offline feature-hashing embedder
    Hashing,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which embedder to construct
    pub backend: EmbeddingBackend,
    /// Embedding model served by Ollama
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Inputs longer than this many characters are truncated before embedding
    pub max_input_chars: usize,
    /// Concurrent embedding requests while indexing (None = CPU count, capped at 8)
    pub parallel_requests: Option<usize>,
}

impl EmbeddingConfig {
    /// Effective number of concurrent embedding requests
    pub fn parallelism(&self) -> usize {
        self.parallel_requests
            .unwrap_or_else(|| num_cpus::get().min(8))
            .max(1)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model: "all-minilm".to_string(),
            dimensions: 384,
            max_input_chars: 2000,
            parallel_requests: None,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Transport-level retries inside the HTTP client (0 = fail on first error)
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "flan-t5".to_string(),
            temperature: 0.3,
            max_tokens: 200,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

/// Retrieval defaults applied at the service boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Rows retrieved per query when the request does not say
    pub default_top_k: usize,
    /// Rows returned in upload and preview responses
    pub preview_rows: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: 3,
            preview_rows: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [server]
            port = 9100

            [embeddings]
            backend = "hashing"
            dimensions = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.embeddings.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.embeddings.dimensions, 64);
        assert_eq!(config.embeddings.max_input_chars, 2000);
        assert_eq!(config.retrieval.default_top_k, 3);
        assert_eq!(config.llm.max_tokens, 200);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = RagConfig::from_toml("[embeddings]\nbackend = \"faiss\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parallelism_never_zero() {
        let config = EmbeddingConfig {
            parallel_requests: Some(0),
            ..Default::default()
        };
        assert_eq!(config.parallelism(), 1);
    }

    #[test]
    fn test_sample_config_loads() {
        let config =
            RagConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/csv-rag.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.embeddings.backend, EmbeddingBackend::Ollama);
        assert_eq!(config.retrieval.preview_rows, 5);
    }
}
