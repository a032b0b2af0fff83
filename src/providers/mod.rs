//! Provider module
//!
//! This module contains the inference client abstraction and the Ollama
//! implementation used to answer questions.

pub mod base;
pub mod ollama;

pub use base::{ModelInfo, Provider, TokenUsage};
pub use ollama::OllamaProvider;

use crate::config::OllamaConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the shared inference client and verify its model is installed
///
/// Failing here is a model initialization failure: without a model no
/// answer can be produced, so callers stop instead of degrading.
///
/// # Errors
///
/// Returns error if the client cannot be built, Ollama is unreachable, or
/// the configured model is not installed
pub async fn create_provider(config: &OllamaConfig) -> Result<Arc<dyn Provider>> {
    let provider = OllamaProvider::new(config.clone())?;
    provider.check_model().await?;
    Ok(Arc::new(provider))
}
