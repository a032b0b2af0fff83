//! Pizza assistant - review-grounded restaurant Q&A library
//!
//! This library answers questions about a pizza restaurant by retrieving
//! relevant customer reviews and asking a locally hosted language model,
//! keeping a bounded conversation history per session.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Conversation turns, bounded history and the conversation loop
//! - `retrieval`: Document store boundary, review dataset and embedding index
//! - `prompts`: Prompt assembly
//! - `providers`: Inference client abstraction and the Ollama implementation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Terminal command handlers
//!
//! # Example
//!
//! ```no_run
//! use pizza_assistant::agent::ChatSession;
//! use pizza_assistant::providers::create_provider;
//! use pizza_assistant::retrieval::open_store_or_fallback;
//! use pizza_assistant::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider).await?;
//!     let store = open_store_or_fallback(&config.provider.host, &config.retrieval).await;
//!     let mut session = ChatSession::new(store, provider, config.conversation.max_history_turns);
//!
//!     if let Some(answer) = session.ask("How is the crust?").await {
//!         println!("{}", answer.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod retrieval;

// Re-export commonly used types
pub use agent::{ChatSession, History, LoopState, Turn};
pub use config::Config;
pub use error::{AssistantError, Result};

#[cfg(test)]
pub mod test_utils;
