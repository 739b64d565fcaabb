//! Application state for the RAG server

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::ParsedCsv;
use crate::providers::{self, EmbeddingProvider, LlmProvider};
use crate::retrieval::RagEngine;
use crate::types::{QueryResult, StoredFile};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Per-file indices and the providers behind them
    engine: RagEngine,
    /// Uploaded files (in memory only)
    files: DashMap<String, StoredFile>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state with the configured providers
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing RAG application state (embeddings: {:?})...",
            config.embeddings.backend
        );
        let (embedder, llm) = providers::from_config(&config)?;
        Ok(Self::with_providers(config, embedder, llm))
    }

    /// Create state around explicitly constructed providers
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let parallelism = config.embeddings.parallelism();
        let engine = RagEngine::new(embedder, llm).with_parallelism(parallelism);
        tracing::info!("RAG engine initialized ({} parallel embedding requests)", parallelism);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                files: DashMap::new(),
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the RAG engine
    pub fn engine(&self) -> &RagEngine {
        &self.inner.engine
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Store a parsed CSV and index its rows
    ///
    /// The file is registered only after indexing succeeds.
    pub async fn ingest(&self, file_name: &str, parsed: ParsedCsv) -> Result<StoredFile> {
        let file = StoredFile::new(file_name, parsed.columns, parsed.rows);

        self.inner
            .engine
            .index_document(&file.file_id, file.rows.clone())
            .await?;
        self.inner.files.insert(file.file_id.clone(), file.clone());

        tracing::info!(
            "Stored {} as {} ({} rows)",
            file.file_name,
            file.file_id,
            file.rows.len()
        );
        Ok(file)
    }

    /// Run a query against a stored file
    pub async fn query(&self, file_id: &str, query: &str, top_k: usize) -> Result<QueryResult> {
        if !self.inner.files.contains_key(file_id) {
            return Err(Error::FileNotFound(file_id.to_string()));
        }
        self.inner.engine.query(file_id, query, top_k).await
    }

    /// Get a file by ID
    pub fn get_file(&self, file_id: &str) -> Option<StoredFile> {
        self.inner.files.get(file_id).map(|f| f.clone())
    }

    /// List all files, oldest first
    pub fn list_files(&self) -> Vec<StoredFile> {
        let mut files: Vec<StoredFile> = self
            .inner
            .files
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        files.sort_by_key(|f| f.uploaded_at);
        files
    }

    /// Remove a file and evict its index
    pub fn delete_file(&self, file_id: &str) -> Result<StoredFile> {
        let (_, file) = self
            .inner
            .files
            .remove(file_id)
            .ok_or_else(|| Error::FileNotFound(file_id.to_string()))?;
        self.inner.engine.forget(file_id);

        tracing::info!("Deleted {} ({})", file.file_name, file_id);
        Ok(file)
    }
}
