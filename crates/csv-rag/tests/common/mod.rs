//! Shared stub providers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use csv_rag::error::{Error, Result};
use csv_rag::providers::{EmbeddingProvider, LlmProvider};
use csv_rag::server::state::AppState;
use csv_rag::RagConfig;

/// Embedder answering from a fixed table; anything else embeds to zeros
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbedder {
    pub fn new(pairs: &[(&str, [f32; 2])]) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
        }
    }

    /// Vectors for the two-person example file
    pub fn people() -> Self {
        Self::new(&[
            ("name:Alice age:30", [1.0, 0.0]),
            ("name:Bob age:25", [0.0, 1.0]),
            ("who is 30", [0.9, 0.1]),
            ("who is 25", [0.2, 0.8]),
        ])
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.table.get(text).cloned().unwrap_or_else(|| vec![0.0, 0.0]))
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "table"
    }
}

/// LLM that answers with the last context line and counts calls
///
/// Prompts mentioning "slow question" wait until `release` is notified.
#[derive(Default)]
pub struct StubLlm {
    pub calls: AtomicUsize,
    pub release: Notify,
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("slow question") {
            self.release.notified().await;
        }
        let context = prompt
            .lines()
            .nth(1)
            .ok_or_else(|| Error::generation("prompt has no context line"))?;
        Ok(format!("Based on: {}", context))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn state_with(embedder: Arc<dyn EmbeddingProvider>, llm: Arc<StubLlm>) -> AppState {
    let mut config = RagConfig::default();
    config.embeddings.parallel_requests = Some(4);
    AppState::with_providers(config, embedder, llm)
}

pub const PEOPLE_CSV: &str = "name,age\nAlice,30\nBob,25\n";
