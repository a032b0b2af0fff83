//! Error types for the pizza assistant
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for assistant operations
///
/// Covers configuration loading, model and embedding calls, review dataset
/// handling and document retrieval. Most of these are recovered inside the
/// conversation loop; only `Config` and `ModelUnavailable` are expected to
/// reach the user as a hard failure.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inference provider errors (connection, status, malformed response)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The configured model cannot be used at all
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Document store errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Embedding model errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Review dataset errors (missing file, malformed records)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for assistant operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// allowing callers to downcast to [`AssistantError`].
pub type Result<T> = anyhow::Result<T>;
