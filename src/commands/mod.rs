/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`  - Interactive question/answer loop
- `ask`   - Answer one question and exit
- `index` - Build or refresh the review embedding cache

The handlers stay thin: they wire configuration into the provider, the
review store and a `ChatSession`, and take care of terminal output.
*/

use crate::agent::{ChatSession, History, LoopState, Turn};
use crate::config::Config;
use crate::error::Result;
use crate::providers::{create_provider, Provider};
use crate::retrieval::{open_review_index, open_store_or_fallback, DocumentStore};
use anyhow::Context;
use colored::{ColoredString, Colorize};
use std::sync::Arc;

// Special commands parser for the interactive loop
pub mod special_commands;

/// Connect to the model and open the review store
///
/// The model check comes first and is fatal. The review store never fails:
/// if it cannot be opened, questions are answered without reviews.
async fn connect(config: &Config) -> Result<(Arc<dyn DocumentStore>, Arc<dyn Provider>)> {
    let provider = create_provider(&config.provider).await.with_context(|| {
        format!(
            "Cannot start without model '{}'. Is Ollama running at {}?",
            config.provider.model, config.provider.host
        )
    })?;

    let store = open_store_or_fallback(&config.provider.host, &config.retrieval).await;
    Ok((store, provider))
}

/// Start a session configured from `config`
fn new_session(
    config: &Config,
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn Provider>,
) -> ChatSession {
    ChatSession::new(store, provider, config.conversation.max_history_turns)
}

/// Progress line shown while a call is in flight
fn progress_message(state: LoopState) -> Option<&'static str> {
    match state {
        LoopState::AwaitingRetrieval => Some("Searching for information..."),
        LoopState::AwaitingGeneration => Some("Thinking..."),
        LoopState::Idle => None,
    }
}

fn print_progress(state: LoopState) {
    if let Some(message) = progress_message(state) {
        println!("{}", message.dimmed());
    }
}

fn colored_label(turn: &Turn) -> ColoredString {
    match turn {
        Turn::Human(_) => "You".bold().cyan(),
        Turn::Assistant(_) => "Assistant".bold().yellow(),
    }
}

fn print_history(history: &History) {
    if history.is_empty() {
        println!("No conversation yet.\n");
        return;
    }

    println!(
        "{}",
        format!(
            "Last {} of at most {} turns:",
            history.len(),
            history.max_turns()
        )
        .bold()
    );
    for turn in history.turns() {
        println!("{}: {}", colored_label(turn), turn.content());
    }
    println!();
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Reads one question per line with rustyline, answers it through a
    //! `ChatSession`, and prints the answer. The loop ends on `q`, `quit`,
    //! `exit`, Ctrl-C or end of input.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    const PROMPT: &str = "ask your question (q to quit): ";

    /// Start interactive chat
    ///
    /// # Errors
    ///
    /// Returns error if the model is unavailable or the terminal cannot be
    /// initialized
    pub async fn run_chat(config: Config) -> Result<()> {
        let (store, provider) = connect(&config).await?;
        let mut session = new_session(&config, store, provider).with_observer(print_progress);
        tracing::info!("Starting chat session {}", session.id());

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(&config);

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Clear) => {
                            session.clear();
                            println!("Conversation cleared.\n");
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            print_history(session.history());
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            println!("{}\n", e.to_string().red());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    if let Some(answer) = session.ask(&line).await {
                        println!("\n{}\n", answer.content());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        tracing::info!(
            "Chat session {} ended with {} turns in history",
            session.id(),
            session.history().len()
        );
        Ok(())
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n{}", "Pizza Restaurant Review Assistant".bold());
        println!(
            "Model: {}   History: {} turns",
            config.provider.model.cyan(),
            config.conversation.max_history_turns
        );
        println!("Type /help for commands.\n");
    }

}

// One-shot question handler
pub mod ask {
    use super::*;

    /// Answer `question` and print the answer to stdout
    ///
    /// A blank question is ignored without contacting the model.
    ///
    /// # Errors
    ///
    /// Returns error if the model is unavailable
    pub async fn run_ask(config: Config, question: String) -> Result<()> {
        if question.trim().is_empty() {
            tracing::warn!("Nothing to ask: question is empty");
            return Ok(());
        }

        let (store, provider) = connect(&config).await?;
        let mut session = new_session(&config, store, provider);

        if let Some(answer) = session.ask(&question).await {
            println!("{}", answer.content());
        }
        Ok(())
    }

}

// Index command handler
pub mod index {
    use super::*;

    /// Embed the review dataset and write the cache
    ///
    /// Unless `rebuild` is set, a cache that still matches the dataset and
    /// embedding model is reused.
    ///
    /// # Errors
    ///
    /// Returns error if the dataset cannot be loaded or embedding fails
    pub async fn run_index(config: Config, rebuild: bool) -> Result<()> {
        let index = open_review_index(&config.provider.host, &config.retrieval, rebuild).await?;
        println!(
            "Indexed {} reviews with {} ({})",
            index.len(),
            config.retrieval.embedding_model,
            config.retrieval.resolved_cache_path().display()
        );
        Ok(())
    }

}
