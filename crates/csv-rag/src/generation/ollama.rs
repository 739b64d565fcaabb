//! Ollama HTTP client for embeddings and completions

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Ollama API client with optional transport retry
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
    /// Model used for `/api/embeddings`
    embed_model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig, embed_model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            embed_model: embed_model.into(),
        })
    }

    /// Generation model name
    pub fn generate_model(&self) -> &str {
        &self.config.generate_model
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}; retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// True when `/api/tags` answers with a success status
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        Ok(self
            .client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false))
    }

    /// POST `body` to `path` and decode the JSON reply
    ///
    /// Every failure is reported through `fail`, so callers choose whether it
    /// surfaces as an embedding or a generation error.
    async fn post_json<B, R>(&self, path: &str, body: &B, fail: fn(String) -> Error) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);
        let (client, url) = (&self.client, url.as_str());

        self.retry_request(move || async move {
            let response = client
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(|e| fail(format!("{} unreachable: {}", url, e)))?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(fail(format!("{} returned HTTP {}: {}", url, status, detail)));
            }

            response
                .json::<R>()
                .await
                .map_err(|e| fail(format!("Malformed reply from {}: {}", url, e)))
        })
        .await
    }

    /// Embed one text with the configured embedding model
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.embed_model,
            prompt: text,
        };
        let reply: EmbedResponse = self
            .post_json("/api/embeddings", &request, Error::Embedding)
            .await?;
        Ok(reply.embedding)
    }

    /// Complete `prompt` with the configured generation model
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(
            "Generating with {} ({} prompt chars)",
            self.config.generate_model,
            prompt.len()
        );

        let request = GenerateRequest {
            model: &self.config.generate_model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };
        let reply: GenerateResponse = self
            .post_json("/api/generate", &request, Error::Generation)
            .await?;
        Ok(reply.response)
    }
}

/// Delay before retry `attempt` (0-based): 1s, 2s, 4s, ... capped at 64s
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt.min(MAX_BACKOFF_EXPONENT)))
}

const MAX_BACKOFF_EXPONENT: u32 = 6;
