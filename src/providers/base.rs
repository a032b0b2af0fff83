//! Base provider trait and common types
//!
//! This module defines the Provider trait that inference backends implement,
//! along with the token usage and model metadata types they report.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token usage information from a generation
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the inference server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Installed model as reported by the inference server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier (e.g., "llama3.2:latest")
    pub name: String,
    /// Size on disk in bytes
    pub size: u64,
}

impl ModelInfo {
    /// Whether this entry satisfies a configured model name
    ///
    /// A configured name without a tag matches the `latest` tag, mirroring
    /// how Ollama resolves bare model names.
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::providers::ModelInfo;
    ///
    /// let model = ModelInfo { name: "llama3.2:latest".to_string(), size: 0 };
    /// assert!(model.matches("llama3.2"));
    /// assert!(model.matches("llama3.2:latest"));
    /// assert!(!model.matches("llama3.2:1b"));
    /// ```
    pub fn matches(&self, configured: &str) -> bool {
        if self.name == configured {
            return true;
        }
        !configured.contains(':') && self.name == format!("{}:latest", configured)
    }
}

/// Inference client boundary
///
/// Given a fully assembled prompt, returns the generated text. The model and
/// connection details are fixed at construction time, never per call.
/// Implementations are shared between sessions, so they must tolerate
/// concurrent independent calls.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generates a completion for a prompt
    ///
    /// # Errors
    ///
    /// Returns error on timeouts, connection failures, non-success statuses
    /// or malformed responses
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering prompts
    fn model(&self) -> String;
}
