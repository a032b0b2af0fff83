//! In-memory review index
//!
//! Holds one embedding per review and answers queries by brute-force cosine
//! similarity. Embeddings are expensive to compute, so the index can be
//! persisted as JSON and reused as long as its fingerprint (embedding model
//! plus review documents) still matches.

use crate::config::RetrievalConfig;
use crate::error::{AssistantError, Result};
use crate::retrieval::{DocumentStore, Embedder, Review};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

/// A review document with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedDocument {
    document: String,
    embedding: Vec<f32>,
}

/// On-disk layout of the embedding cache
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    fingerprint: String,
    model: String,
    entries: Vec<IndexedDocument>,
}

/// Search hit with its similarity score (higher is better)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    /// Review document text
    pub document: String,
    /// Cosine similarity to the query, in -1.0..=1.0
    pub score: f64,
}

/// Embedding index over review documents
///
/// Read-only after construction, so one index can serve every session.
pub struct ReviewIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<IndexedDocument>,
    fingerprint: String,
    top_k: usize,
}

/// Fingerprint identifying an embedding model and document set
///
/// # Examples
///
/// ```
/// use pizza_assistant::retrieval::index::fingerprint;
///
/// let docs = vec!["Great crust".to_string()];
/// assert_eq!(fingerprint("mxbai-embed-large", &docs), fingerprint("mxbai-embed-large", &docs));
/// assert_ne!(fingerprint("mxbai-embed-large", &docs), fingerprint("nomic-embed-text", &docs));
/// ```
pub fn fingerprint(model: &str, documents: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    for document in documents {
        hasher.update(document.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

impl ReviewIndex {
    /// Embed `documents` and build an index returning `top_k` hits per query
    ///
    /// Documents are embedded `batch_size` at a time.
    ///
    /// # Errors
    ///
    /// Returns error if any embedding batch fails
    pub async fn build(
        embedder: Arc<dyn Embedder>,
        documents: Vec<String>,
        top_k: usize,
        batch_size: usize,
    ) -> Result<Self> {
        let fingerprint = fingerprint(embedder.model(), &documents);
        let batch_size = batch_size.max(1);
        let mut entries = Vec::with_capacity(documents.len());

        for (batch_number, batch) in documents.chunks(batch_size).enumerate() {
            let vectors = embedder.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(AssistantError::Embedding(format!(
                    "batch {} returned {} embeddings for {} documents",
                    batch_number,
                    vectors.len(),
                    batch.len()
                ))
                .into());
            }

            entries.extend(
                batch
                    .iter()
                    .zip(vectors)
                    .map(|(document, embedding)| IndexedDocument {
                        document: document.clone(),
                        embedding,
                    }),
            );
            tracing::debug!("Embedded {}/{} reviews", entries.len(), documents.len());
        }

        tracing::info!(
            "Built review index: {} documents, model={}",
            entries.len(),
            embedder.model()
        );

        Ok(Self {
            embedder,
            entries,
            fingerprint,
            top_k,
        })
    }

    /// Reuse the cached index when valid, otherwise embed and persist
    ///
    /// A cache that is missing, unreadable, or built from different reviews
    /// or a different embedding model is ignored. Failing to write the new
    /// cache is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns error if embedding fails
    pub async fn load_or_build(
        embedder: Arc<dyn Embedder>,
        reviews: &[Review],
        config: &RetrievalConfig,
        rebuild: bool,
    ) -> Result<Self> {
        let documents: Vec<String> = reviews.iter().map(Review::document).collect();
        let expected = fingerprint(embedder.model(), &documents);
        let cache_path = config.resolved_cache_path();

        if !rebuild {
            if let Some(index) =
                Self::load_cached(&cache_path, embedder.clone(), &expected, config.top_k)
            {
                tracing::info!(
                    "Loaded {} cached review embeddings from {}",
                    index.len(),
                    cache_path.display()
                );
                return Ok(index);
            }
        }

        let index = Self::build(embedder, documents, config.top_k, config.batch_size).await?;
        if let Err(e) = index.save(&cache_path) {
            tracing::warn!(
                "Failed to write embedding cache to {}: {:#}",
                cache_path.display(),
                e
            );
        }
        Ok(index)
    }

    fn load_cached(
        path: &Path,
        embedder: Arc<dyn Embedder>,
        expected_fingerprint: &str,
        top_k: usize,
    ) -> Option<Self> {
        if !path.exists() {
            tracing::debug!("No embedding cache at {}", path.display());
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read embedding cache {}: {}", path.display(), e);
                return None;
            }
        };

        let file: IndexFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Ignoring corrupt embedding cache {}: {}", path.display(), e);
                return None;
            }
        };

        if file.fingerprint != expected_fingerprint {
            tracing::info!(
                "Embedding cache is stale (model={}), rebuilding",
                file.model
            );
            return None;
        }

        Some(Self {
            embedder,
            entries: file.entries,
            fingerprint: file.fingerprint,
            top_k,
        })
    }

    /// Persist the index as JSON, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = IndexFile {
            fingerprint: self.fingerprint.clone(),
            model: self.embedder.model().to_string(),
            entries: self.entries.clone(),
        };
        std::fs::write(path, serde_json::to_string(&file)?)?;
        tracing::debug!("Saved embedding cache to {}", path.display());
        Ok(())
    }

    /// Rank every document against `query` and return the best `top_k`
    ///
    /// Ties keep dataset order.
    ///
    /// # Errors
    ///
    /// Returns error if embedding the query fails
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredDocument>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AssistantError::Embedding("no embedding returned for query".to_string())
            })?;

        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.top_k);
        Ok(scored)
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fingerprint of the indexed model and documents
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[async_trait]
impl DocumentStore for ReviewIndex {
    async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        let hits = self.search(query).await?;
        tracing::debug!(
            "Retrieved {} reviews (best score {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );
        Ok(hits.into_iter().map(|hit| hit.document).collect())
    }
}

/// Cosine similarity between two vectors
///
/// Vectors of different length, empty vectors and zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{temp_dir, KeywordEmbedder};
    use std::path::PathBuf;

    fn docs() -> Vec<String> {
        vec![
            "Delivery took an hour".to_string(),
            "Crust was crisp, crust was perfect".to_string(),
            "Sauce too sweet".to_string(),
            "Cheese and crust both great".to_string(),
        ]
    }

    fn reviews() -> Vec<Review> {
        docs()
            .into_iter()
            .map(|text| Review {
                title: String::new(),
                date: String::new(),
                rating: None,
                review: text,
            })
            .collect()
    }

    fn config_with_cache(path: PathBuf) -> RetrievalConfig {
        RetrievalConfig {
            cache_path: Some(path),
            top_k: 2,
            batch_size: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_fingerprint_depends_on_documents() {
        let a = fingerprint("m", &docs());
        let mut changed = docs();
        changed[0].push('!');
        assert_ne!(a, fingerprint("m", &changed));
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_build_embeds_in_batches() {
        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::build(embedder.clone(), docs(), 2, 3)
            .await
            .unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::build(embedder, docs(), 2, 10).await.unwrap();

        let hits = index.search("How is the crust?").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document, "Crust was crisp, crust was perfect");
        assert_eq!(hits[1].document, "Cheese and crust both great");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_retrieve_returns_document_texts() {
        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::build(embedder, docs(), 1, 10).await.unwrap();

        let documents = index.retrieve("slow delivery").await.unwrap();
        assert_eq!(documents, vec!["Delivery took an hour".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_index_skips_query_embedding() {
        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::build(embedder.clone(), Vec::new(), 5, 10)
            .await
            .unwrap();

        assert!(index.is_empty());
        assert!(index.search("crust").await.unwrap().is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_build_propagates_embedding_failure() {
        let embedder = Arc::new(KeywordEmbedder::failing());
        assert!(ReviewIndex::build(embedder, docs(), 2, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_load_or_build_reuses_cache() {
        let dir = temp_dir();
        let config = config_with_cache(dir.path().join("cache").join("index.json"));

        let first = Arc::new(KeywordEmbedder::new());
        let built = ReviewIndex::load_or_build(first.clone(), &reviews(), &config, false)
            .await
            .unwrap();
        assert!(first.calls() > 0);
        assert!(config.resolved_cache_path().exists());

        let second = Arc::new(KeywordEmbedder::new());
        let loaded = ReviewIndex::load_or_build(second.clone(), &reviews(), &config, false)
            .await
            .unwrap();
        assert_eq!(second.calls(), 0);
        assert_eq!(loaded.len(), built.len());
        assert_eq!(loaded.fingerprint(), built.fingerprint());
    }

    #[tokio::test]
    async fn test_load_or_build_rebuild_ignores_cache() {
        let dir = temp_dir();
        let config = config_with_cache(dir.path().join("index.json"));

        ReviewIndex::load_or_build(Arc::new(KeywordEmbedder::new()), &reviews(), &config, false)
            .await
            .unwrap();

        let embedder = Arc::new(KeywordEmbedder::new());
        ReviewIndex::load_or_build(embedder.clone(), &reviews(), &config, true)
            .await
            .unwrap();
        assert!(embedder.calls() > 0);
    }

    #[tokio::test]
    async fn test_load_or_build_detects_stale_cache() {
        let dir = temp_dir();
        let config = config_with_cache(dir.path().join("index.json"));

        ReviewIndex::load_or_build(Arc::new(KeywordEmbedder::new()), &reviews(), &config, false)
            .await
            .unwrap();

        let mut changed = reviews();
        changed.pop();
        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::load_or_build(embedder.clone(), &changed, &config, false)
            .await
            .unwrap();
        assert!(embedder.calls() > 0);
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_load_or_build_ignores_corrupt_cache() {
        let dir = temp_dir();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{not json").unwrap();

        let embedder = Arc::new(KeywordEmbedder::new());
        let index = ReviewIndex::load_or_build(
            embedder.clone(),
            &reviews(),
            &config_with_cache(path),
            false,
        )
        .await
        .unwrap();
        assert_eq!(index.len(), 4);
        assert!(embedder.calls() > 0);
    }

    #[tokio::test]
    async fn test_unwritable_cache_does_not_fail_build() {
        let dir = temp_dir();
        // A regular file where a directory is expected makes the write fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let config = config_with_cache(blocker.join("index.json"));

        let index = ReviewIndex::load_or_build(
            Arc::new(KeywordEmbedder::new()),
            &reviews(),
            &config,
            false,
        )
        .await
        .unwrap();
        assert_eq!(index.len(), 4);
    }
}
