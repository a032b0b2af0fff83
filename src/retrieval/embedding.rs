//! Embedding model abstraction
//!
//! The review index only needs one capability from an embedding model:
//! turn a batch of texts into vectors, one per input, in order.

use crate::error::{AssistantError, Result};
use crate::providers::ollama::{build_http_client, endpoint};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Timeout for one embedding batch (seconds)
const EMBED_TIMEOUT_SECONDS: u64 = 300;

/// Text embedding model
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input, returning vectors in input order
    ///
    /// # Errors
    ///
    /// Returns error if the model call fails or returns the wrong number of
    /// vectors
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model; part of the index fingerprint
    fn model(&self) -> &str;
}

/// Ollama embedding client using `/api/embed`
pub struct OllamaEmbedder {
    client: Client,
    host: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create an embedder for `model` served by `host`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::retrieval::{Embedder, OllamaEmbedder};
    ///
    /// let embedder = OllamaEmbedder::new("http://localhost:11434", "mxbai-embed-large").unwrap();
    /// assert_eq!(embedder.model(), "mxbai-embed-large");
    /// ```
    pub fn new(host: &str, model: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client(EMBED_TIMEOUT_SECONDS)?,
            host: host.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = endpoint(&self.host, "/api/embed");
        tracing::debug!("Embedding {} inputs with {}", inputs.len(), self.model);

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: inputs,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Ollama embed request failed: {}", e);
                AssistantError::Embedding(format!("Ollama embed request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(AssistantError::Embedding(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: EmbedResponse = response.json().await.map_err(|e| {
            AssistantError::Embedding(format!("Failed to parse embed response: {}", e))
        })?;

        if body.embeddings.len() != inputs.len() {
            return Err(AssistantError::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                body.embeddings.len()
            ))
            .into());
        }

        Ok(body.embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
