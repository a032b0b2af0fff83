//! Configuration management for the pizza assistant
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Holds the inference provider connection, the review retrieval settings
/// and the conversation window size.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ollama inference configuration
    #[serde(default)]
    pub provider: OllamaConfig,
    /// Review retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Conversation history configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model used to answer questions
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout for generation calls (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Review retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Path to the YAML review dataset
    #[serde(default = "default_reviews_path")]
    pub reviews_path: PathBuf,

    /// Embedding model served by the same Ollama host
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Number of reviews returned per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Number of documents embedded per request while indexing
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Location of the embedding cache; platform data dir when unset
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

fn default_reviews_path() -> PathBuf {
    PathBuf::from("data/reviews.yaml")
}

fn default_embedding_model() -> String {
    "mxbai-embed-large".to_string()
}

fn default_top_k() -> usize {
    5
}

fn default_batch_size() -> usize {
    32
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            reviews_path: default_reviews_path(),
            embedding_model: default_embedding_model(),
            top_k: default_top_k(),
            batch_size: default_batch_size(),
            cache_path: None,
        }
    }
}

impl RetrievalConfig {
    /// Resolve where the embedding cache lives
    ///
    /// Uses the configured `cache_path` when present, otherwise the
    /// platform data directory, otherwise a dot-directory in the working
    /// directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::config::RetrievalConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = RetrievalConfig {
    ///     cache_path: Some(PathBuf::from("/tmp/index.json")),
    ///     ..Default::default()
    /// };
    /// assert_eq!(config.resolved_cache_path(), PathBuf::from("/tmp/index.json"));
    /// ```
    pub fn resolved_cache_path(&self) -> PathBuf {
        if let Some(path) = &self.cache_path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "pizza-assistant", "pizza-assistant")
            .map(|dirs| dirs.data_dir().join("review-index.json"))
            .unwrap_or_else(|| PathBuf::from(".pizza-assistant").join("review-index.json"))
    }
}

/// Conversation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum number of turns (human and assistant) kept in history
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

fn default_max_history_turns() -> usize {
    10
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AssistantError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| AssistantError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("PIZZA_ASSISTANT_OLLAMA_HOST") {
            self.provider.host = host;
        }

        if let Ok(model) = std::env::var("PIZZA_ASSISTANT_MODEL") {
            self.provider.model = model;
        }

        if let Ok(model) = std::env::var("PIZZA_ASSISTANT_EMBEDDING_MODEL") {
            self.retrieval.embedding_model = model;
        }

        if let Ok(reviews) = std::env::var("PIZZA_ASSISTANT_REVIEWS") {
            self.retrieval.reviews_path = PathBuf::from(reviews);
        }

        if let Ok(top_k) = std::env::var("PIZZA_ASSISTANT_TOP_K") {
            match top_k.parse::<usize>() {
                Ok(value) => {
                    self.retrieval.top_k = value;
                    tracing::debug!(top_k = value, "Env override: PIZZA_ASSISTANT_TOP_K");
                }
                Err(_) => tracing::warn!("Invalid PIZZA_ASSISTANT_TOP_K: {}", top_k),
            }
        }

        if let Ok(max_history) = std::env::var("PIZZA_ASSISTANT_MAX_HISTORY") {
            match max_history.parse::<usize>() {
                Ok(value) => {
                    self.conversation.max_history_turns = value;
                    tracing::debug!(
                        max_history_turns = value,
                        "Env override: PIZZA_ASSISTANT_MAX_HISTORY"
                    );
                }
                Err(_) => tracing::warn!("Invalid PIZZA_ASSISTANT_MAX_HISTORY: {}", max_history),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }

        if let Some(max_history) = cli.max_history {
            self.conversation.max_history_turns = max_history;
        }

        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range or malformed
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(AssistantError::Config("provider.model cannot be empty".to_string()).into());
        }

        match url::Url::parse(&self.provider.host) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(AssistantError::Config(format!(
                    "provider.host must use http or https, got scheme '{}'",
                    url.scheme()
                ))
                .into());
            }
            Err(e) => {
                return Err(AssistantError::Config(format!(
                    "provider.host is not a valid URL ({}): {}",
                    self.provider.host, e
                ))
                .into());
            }
        }

        if self.provider.timeout_seconds == 0 {
            return Err(AssistantError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.retrieval.embedding_model.trim().is_empty() {
            return Err(AssistantError::Config(
                "retrieval.embedding_model cannot be empty".to_string(),
            )
            .into());
        }

        if self.retrieval.top_k == 0 {
            return Err(
                AssistantError::Config("retrieval.top_k must be greater than 0".to_string()).into(),
            );
        }

        if self.retrieval.batch_size == 0 {
            return Err(AssistantError::Config(
                "retrieval.batch_size must be greater than 0".to_string(),
            )
            .into());
        }

        // One question and its answer must fit.
        if self.conversation.max_history_turns < 2 {
            return Err(AssistantError::Config(
                "conversation.max_history_turns must be at least 2".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
