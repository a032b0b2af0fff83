//! Agent module for the pizza assistant
//!
//! This module contains the conversation model (turns and the bounded
//! history) and the per-session conversation loop that ties retrieval,
//! prompt assembly and generation together.

pub mod history;
pub mod session;
pub mod turn;

pub use history::History;
pub use session::{answer_or_apology, ChatSession, LoopState, StateObserver};
pub use turn::Turn;
