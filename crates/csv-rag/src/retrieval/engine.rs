//! Retrieval-augmented query engine
//!
//! Owns one [`DocumentIndex`] per file identifier. Indices are built completely
//! before they are published with a single map insert, so a concurrent query sees
//! either the previous index or the new one. Queries clone the index `Arc` and
//! release the map shard before any embedding or generation call.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::types::{QueryResult, Row};

use super::index::DocumentIndex;
use super::ranker;

/// Per-file RAG engine
pub struct RagEngine {
    indices: DashMap<String, Arc<DocumentIndex>>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    parallelism: usize,
}

impl RagEngine {
    /// Create an engine with no indexed files
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            indices: DashMap::new(),
            embedder,
            llm,
            parallelism: 1,
        }
    }

    /// Number of concurrent embedding requests while indexing
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Build and publish the index for `file_id`, replacing any previous one
    ///
    /// Returns the number of indexed rows. On error the previous index, if any,
    /// stays in place.
    pub async fn index_document(&self, file_id: &str, rows: Vec<Row>) -> Result<usize> {
        let start = Instant::now();
        let row_count = rows.len();

        let index = DocumentIndex::build(rows, self.embedder.as_ref(), self.parallelism).await?;
        let replaced = self
            .indices
            .insert(file_id.to_string(), Arc::new(index))
            .is_some();

        tracing::info!(
            "Indexed {} rows for {} in {}ms{}",
            row_count,
            file_id,
            start.elapsed().as_millis(),
            if replaced { " (replaced previous index)" } else { "" }
        );

        Ok(row_count)
    }

    /// Answer `query_text` from the `top_k` best rows of `file_id`
    pub async fn query(&self, file_id: &str, query_text: &str, top_k: usize) -> Result<QueryResult> {
        let start = Instant::now();

        let index = self
            .indices
            .get(file_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotIndexed(file_id.to_string()))?;

        if top_k == 0 {
            return Err(Error::InvalidRequest("top_k must be at least 1".to_string()));
        }

        let query_embedding = self.embedder.embed(query_text).await?;
        if !index.is_empty() && query_embedding.len() != index.dimensions() {
            return Err(Error::embedding(format!(
                "Query embedding has {} dimensions, index has {}",
                query_embedding.len(),
                index.dimensions()
            )));
        }

        let ranked = ranker::top_k(&index, &query_embedding, top_k);
        if let (Some(best), Some(worst)) = (ranked.first(), ranked.last()) {
            tracing::debug!(
                "Ranked {} of {} rows for {} (scores {:.4}..{:.4})",
                ranked.len(),
                index.len(),
                file_id,
                best.score,
                worst.score
            );
        }

        let context = PromptBuilder::build_context(ranked.iter().map(|r| r.entry));
        let prompt = PromptBuilder::build_qa_prompt(query_text, &context);

        let answer = self.llm.generate(&prompt).await?;
        let relevant_rows = ranked.iter().map(|r| r.entry.row.clone()).collect();

        tracing::info!(
            "Answered query on {} with {} ({} rows) in {}ms",
            file_id,
            self.llm.model(),
            ranked.len(),
            start.elapsed().as_millis()
        );

        Ok(QueryResult {
            answer,
            relevant_rows,
        })
    }

    /// Drop the index for `file_id`; returns whether one existed
    pub fn forget(&self, file_id: &str) -> bool {
        let removed = self.indices.remove(file_id).is_some();
        if removed {
            tracing::info!("Evicted index for {}", file_id);
        }
        removed
    }

    /// Whether `file_id` currently has an index
    pub fn is_indexed(&self, file_id: &str) -> bool {
        self.indices.contains_key(file_id)
    }

    /// Number of rows indexed for `file_id`
    pub fn indexed_count(&self, file_id: &str) -> Option<usize> {
        self.indices.get(file_id).map(|entry| entry.value().len())
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Embedding provider in use
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// LLM provider in use
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }
}
