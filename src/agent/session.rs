//! Conversation loop for one chat session
//!
//! A session owns its history and drives each question through the
//! retrieve, assemble, generate cycle:
//! - Append the question as a Human turn
//! - Retrieve reviews, falling back to placeholder context on failure
//! - Build the prompt from context, full history and question
//! - Generate an answer, or an apology if the model call fails
//! - Append the Assistant turn and trim the history window

use crate::agent::{History, Turn};
use crate::error::Result;
use crate::prompts;
use crate::providers::Provider;
use crate::retrieval::{context_or_placeholder, DocumentStore};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where the conversation loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next question
    Idle,
    /// Question recorded, document store call in flight
    AwaitingRetrieval,
    /// Prompt built, inference call in flight
    AwaitingGeneration,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Idle => write!(f, "idle"),
            LoopState::AwaitingRetrieval => write!(f, "awaiting retrieval"),
            LoopState::AwaitingGeneration => write!(f, "awaiting generation"),
        }
    }
}

/// Callback invoked on every state transition
pub type StateObserver = Box<dyn Fn(LoopState) + Send + Sync>;

/// Turns a generation outcome into the text of the Assistant turn
///
/// # Examples
///
/// ```
/// use pizza_assistant::agent::answer_or_apology;
///
/// assert_eq!(answer_or_apology(Ok("Yes.".to_string())), "Yes.");
/// assert_eq!(
///     answer_or_apology(Err(anyhow::anyhow!("connection refused"))),
///     "Sorry, I encountered an error: connection refused"
/// );
/// ```
pub fn answer_or_apology(result: Result<String>) -> String {
    match result {
        Ok(answer) => answer,
        Err(e) => format!("Sorry, I encountered an error: {}", e),
    }
}

/// One conversation with the assistant
///
/// The document store and inference client are shared, read-only
/// resources; the history belongs to this session alone and is dropped
/// with it. `ask` takes `&mut self`, so a session never has more than one
/// question in flight.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use pizza_assistant::agent::ChatSession;
/// use pizza_assistant::providers::Provider;
/// use pizza_assistant::retrieval::UnavailableStore;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Provider for Canned {
///     async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
///         Ok("Reviewers say it is crispy.".to_string())
///     }
///
///     fn model(&self) -> String {
///         "canned".to_string()
///     }
/// }
///
/// let store = Arc::new(UnavailableStore::new("no reviews loaded"));
/// let mut session = ChatSession::new(store, Arc::new(Canned), 10);
///
/// let answer = session.ask("Is the crust crispy?").await.unwrap();
/// assert_eq!(answer.content(), "Reviewers say it is crispy.");
/// assert_eq!(session.history().len(), 2);
/// # });
/// ```
pub struct ChatSession {
    id: Uuid,
    history: History,
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn Provider>,
    state: LoopState,
    observer: Option<StateObserver>,
}

impl ChatSession {
    /// Starts a session with an empty history of at most `max_history_turns`
    pub fn new(
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn Provider>,
        max_history_turns: usize,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(
            "Starting session {} (model={}, max_history_turns={})",
            id,
            provider.model(),
            max_history_turns
        );

        Self {
            id,
            history: History::new(max_history_turns),
            store,
            provider,
            state: LoopState::Idle,
            observer: None,
        }
    }

    /// Registers a callback for state transitions
    ///
    /// The terminal uses this to show progress while calls are in flight.
    pub fn with_observer(mut self, observer: impl Fn(LoopState) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Session identifier, used in log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current conversation history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Forgets the conversation so far
    ///
    /// Leaves the document store and inference client untouched.
    pub fn clear(&mut self) {
        let dropped = self.history.len();
        self.history.clear();
        info!("Session {} cleared ({} turns dropped)", self.id, dropped);
    }

    /// Answers one question
    ///
    /// A blank or whitespace-only question is ignored and returns `None`
    /// without touching the history or making any call. Any other question
    /// is recorded, retrieved against and prompted with exactly as given.
    /// Returns the Assistant turn that was appended, which holds either the
    /// model's answer or an apology describing the failure.
    pub async fn ask(&mut self, question: &str) -> Option<Turn> {
        if question.trim().is_empty() {
            debug!("Ignoring empty question");
            return None;
        }

        self.history.push(Turn::human(question));
        self.transition(LoopState::AwaitingRetrieval);

        let retrieved = self.store.retrieve(question).await;
        if let Err(e) = &retrieved {
            warn!("Session {}: retrieval failed: {:#}", self.id, e);
        }
        let context = context_or_placeholder(retrieved);
        self.transition(LoopState::AwaitingGeneration);

        let prompt = prompts::assemble(&context, self.history.turns(), question);
        debug!(
            "Session {}: prompt has {} chars, {} context documents",
            self.id,
            prompt.len(),
            context.len()
        );

        let generated = self.provider.generate(&prompt).await;
        if let Err(e) = &generated {
            warn!("Session {}: generation failed: {:#}", self.id, e);
        }
        let answer = Turn::assistant(answer_or_apology(generated));
        self.history.push(answer.clone());

        let dropped = self.history.enforce_limit();
        if dropped > 0 {
            debug!("Session {}: dropped {} oldest turns", self.id, dropped);
        }

        self.transition(LoopState::Idle);
        Some(answer)
    }

    fn transition(&mut self, next: LoopState) {
        debug!("Session {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        if let Some(observer) = &self.observer {
            observer(next);
        }
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("history", &self.history)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
