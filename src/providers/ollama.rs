//! Ollama provider implementation
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server to generate answers. Also provides model listing so
//! startup can verify that the configured model is actually installed.

use crate::config::OllamaConfig;
use crate::error::{AssistantError, Result};
use crate::providers::{ModelInfo, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// Sends non-streaming requests to `/api/generate`. A single provider is
/// shared by every session; `reqwest::Client` pools connections internally.
///
/// # Examples
///
/// ```no_run
/// use pizza_assistant::config::OllamaConfig;
/// use pizza_assistant::providers::{OllamaProvider, Provider};
///
/// # async fn example() -> pizza_assistant::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default())?;
/// provider.check_model().await?;
/// let answer = provider.generate("Which pizza do reviewers like most?").await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request body for /api/generate
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from /api/generate
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

/// Response from /api/tags
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

/// Model metadata from /api/tags
#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
    #[serde(default)]
    size: u64,
}

/// Build an HTTP client for talking to Ollama
pub(crate) fn build_http_client(timeout_seconds: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("pizza-assistant/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            AssistantError::Provider(format!("Failed to create HTTP client: {}", e)).into()
        })
}

/// Join a host and an API path without doubling slashes
pub(crate) fn endpoint(host: &str, path: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), path)
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::config::OllamaConfig;
    /// use pizza_assistant::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = build_http_client(config.timeout_seconds)?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// List models installed on the Ollama server
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable or answers with garbage
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = endpoint(&self.config.host, "/api/tags");
        tracing::debug!("Fetching models from Ollama: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch Ollama models: {}", e);
            AssistantError::Provider(format!("Failed to connect to Ollama server: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(AssistantError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama tags response: {}", e);
            AssistantError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        let models: Vec<ModelInfo> = tags
            .models
            .into_iter()
            .map(|tag| ModelInfo {
                name: tag.name,
                size: tag.size,
            })
            .collect();

        tracing::debug!("Fetched {} models from Ollama", models.len());
        Ok(models)
    }

    /// Verify the configured model is installed
    ///
    /// This is the model initialization check: failing it means no answers
    /// can be produced at all, so callers treat the error as fatal.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::ModelUnavailable` when the server cannot be
    /// reached or the model is missing
    pub async fn check_model(&self) -> Result<()> {
        let models = self.list_models().await.map_err(|e| {
            AssistantError::ModelUnavailable(format!(
                "cannot reach Ollama at {}: {}",
                self.config.host, e
            ))
        })?;

        if let Some(found) = models.iter().find(|m| m.matches(&self.config.model)) {
            tracing::debug!("Model {} is available ({} bytes)", found.name, found.size);
            return Ok(());
        }

        Err(AssistantError::ModelUnavailable(format!(
            "model '{}' is not installed on {} (run `ollama pull {}`)",
            self.config.model, self.config.host, self.config.model
        ))
        .into())
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = endpoint(&self.config.host, "/api/generate");
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        tracing::debug!(
            "Sending Ollama request: model={}, prompt_chars={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                AssistantError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(AssistantError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            AssistantError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        let usage = TokenUsage::new(body.prompt_eval_count, body.eval_count);
        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}, total_tokens={}",
            body.done,
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );

        Ok(body.response.trim().to_string())
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
