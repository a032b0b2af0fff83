//! Review retrieval
//!
//! This module defines the document store boundary used by the conversation
//! loop, the fallback policy applied when retrieval fails, and the
//! embedding-backed review index that implements the store.
//!
//! - `reviews`: review dataset loading
//! - `embedding`: embedding model abstraction and the Ollama embedder
//! - `index`: in-memory similarity index with an on-disk embedding cache

pub mod embedding;
pub mod index;
pub mod reviews;

pub use embedding::{Embedder, OllamaEmbedder};
pub use index::{ReviewIndex, ScoredDocument};
pub use reviews::{load_reviews, parse_reviews, Review};

use crate::config::RetrievalConfig;
use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Context used when no reviews can be retrieved
pub const NO_REVIEWS_PLACEHOLDER: &str = "No reviews available.";

/// Document store boundary
///
/// Given a question, returns review texts ordered by descending relevance.
/// How many documents come back is up to the store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Retrieve documents relevant to `query`
    ///
    /// # Errors
    ///
    /// Returns error when the store is unreachable or the query fails
    async fn retrieve(&self, query: &str) -> Result<Vec<String>>;
}

/// Turns a retrieval outcome into prompt context
///
/// Retrieved documents pass through untouched. An error, or a result with no
/// documents, becomes the single [`NO_REVIEWS_PLACEHOLDER`] entry so the
/// pipeline always continues.
///
/// # Examples
///
/// ```
/// use pizza_assistant::retrieval::{context_or_placeholder, NO_REVIEWS_PLACEHOLDER};
///
/// let ok = context_or_placeholder(Ok(vec!["Great crust".to_string()]));
/// assert_eq!(ok, vec!["Great crust".to_string()]);
///
/// let failed = context_or_placeholder(Err(anyhow::anyhow!("store offline")));
/// assert_eq!(failed, vec![NO_REVIEWS_PLACEHOLDER.to_string()]);
/// ```
pub fn context_or_placeholder(result: Result<Vec<String>>) -> Vec<String> {
    match result {
        Ok(documents) if !documents.is_empty() => documents,
        _ => vec![NO_REVIEWS_PLACEHOLDER.to_string()],
    }
}

/// Store used when the review index could not be opened
///
/// Every retrieval fails with the recorded reason, which the conversation
/// loop turns into the placeholder context.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use pizza_assistant::retrieval::{DocumentStore, UnavailableStore};
///
/// let store = UnavailableStore::new("reviews file missing");
/// assert!(store.retrieve("How is the crust?").await.is_err());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    /// Create a store that always fails with `reason`
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn retrieve(&self, _query: &str) -> Result<Vec<String>> {
        Err(AssistantError::Retrieval(self.reason.clone()).into())
    }
}

/// Open the review store described by `config`
///
/// Loads the review dataset and the embedding index (reusing the cache when
/// it is still valid). When `rebuild` is set every review is embedded again.
///
/// # Errors
///
/// Returns error if the dataset cannot be loaded or embedding fails
pub async fn open_review_index(
    host: &str,
    config: &RetrievalConfig,
    rebuild: bool,
) -> Result<ReviewIndex> {
    let reviews = load_reviews(&config.reviews_path)?;
    let embedder = Arc::new(OllamaEmbedder::new(host, &config.embedding_model)?);
    ReviewIndex::load_or_build(embedder, &reviews, config, rebuild).await
}

/// Open the review store, degrading to [`UnavailableStore`] on failure
///
/// Retrieval problems never stop a session: the error is logged and every
/// question is answered with placeholder context instead.
pub async fn open_store_or_fallback(host: &str, config: &RetrievalConfig) -> Arc<dyn DocumentStore> {
    match open_review_index(host, config, false).await {
        Ok(index) => {
            tracing::info!("Review index ready with {} reviews", index.len());
            Arc::new(index)
        }
        Err(e) => {
            tracing::warn!("Review index unavailable, answering without reviews: {:#}", e);
            Arc::new(UnavailableStore::new(format!("{:#}", e)))
        }
    }
}
