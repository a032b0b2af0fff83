//! Test utilities for the pizza assistant
//!
//! Temporary file helpers plus stub document stores, inference clients and
//! embedders so the conversation loop and review index can be tested without
//! a running Ollama server.

use crate::error::{AssistantError, Result};
use crate::providers::Provider;
use crate::retrieval::{DocumentStore, Embedder};

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Panics
///
/// Panics if the directory cannot be created
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Document store returning the same documents for every query
pub struct StaticStore {
    documents: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticStore {
    pub fn new(documents: &[&str]) -> Self {
        Self {
            documents: documents.iter().map(|d| d.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for StaticStore {
    async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.documents.clone())
    }
}

/// Document store that always fails
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn retrieve(&self, _query: &str) -> Result<Vec<String>> {
        Err(AssistantError::Retrieval("connection refused".to_string()).into())
    }
}

/// Inference client replaying canned answers and recording prompts
///
/// Once the script runs out the last answer is repeated.
pub struct ScriptedProvider {
    answers: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Most recent prompt
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        let index = (prompts.len() - 1).min(self.answers.len().saturating_sub(1));
        Ok(self.answers.get(index).cloned().unwrap_or_default())
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Inference client that always fails with `message`
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(AssistantError::Provider(self.message.clone()).into())
    }

    fn model(&self) -> String {
        "failing".to_string()
    }
}

/// Embedder counting topic keywords, one dimension per keyword
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

const KEYWORDS: [&str; 6] = ["crust", "sauce", "cheese", "delivery", "service", "price"];

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Embedder whose every call fails
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    /// Number of `embed` calls made
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        KEYWORDS
            .iter()
            .map(|keyword| text.matches(keyword).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AssistantError::Embedding("model not loaded".to_string()).into());
        }
        Ok(inputs.iter().map(|input| Self::vector(input)).collect())
    }

    fn model(&self) -> &str {
        "keyword"
    }
}
