//! Command-line interface definition for the pizza assistant
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions and
//! review indexing.

use clap::{Parser, Subcommand};

/// Pizza restaurant assistant
///
/// Answers questions about the restaurant using customer reviews and a
/// locally hosted language model.
#[derive(Parser, Debug, Clone)]
#[command(name = "pizza-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the answering model from config
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Override the maximum number of turns kept in history
    #[arg(long, global = true)]
    pub max_history: Option<usize>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive question/answer session
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question to answer
        question: String,
    },

    /// Build the review embedding index
    Index {
        /// Discard any cached embeddings and embed every review again
        #[arg(long)]
        rebuild: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            model: None,
            max_history: None,
            command: Commands::Chat,
        }
    }
}
