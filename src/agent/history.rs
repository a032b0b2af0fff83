//! Bounded conversation history
//!
//! Keeps the turns of one session in insertion order and trims the oldest
//! ones once the configured window is exceeded.

use crate::agent::Turn;

/// Ordered, bounded sequence of conversation turns
///
/// Appending never trims by itself: the conversation loop appends the
/// question, builds the prompt from the full history, appends the answer and
/// only then calls [`History::enforce_limit`]. After that call the length is
/// at most `max_turns` and the retained turns are the most recent ones in
/// their original order.
#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl History {
    /// Creates an empty history holding at most `max_turns` turns
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::agent::History;
    ///
    /// let history = History::new(10);
    /// assert!(history.is_empty());
    /// assert_eq!(history.max_turns(), 10);
    /// ```
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    /// Appends a turn at the end
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drops the oldest turns until the history fits its window
    ///
    /// Returns the number of turns removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::agent::{History, Turn};
    ///
    /// let mut history = History::new(2);
    /// history.push(Turn::human("one"));
    /// history.push(Turn::assistant("two"));
    /// history.push(Turn::human("three"));
    ///
    /// assert_eq!(history.enforce_limit(), 1);
    /// assert_eq!(history.turns()[0], Turn::assistant("two"));
    /// ```
    pub fn enforce_limit(&mut self) -> usize {
        if self.turns.len() <= self.max_turns {
            return 0;
        }

        let excess = self.turns.len() - self.max_turns;
        self.turns.drain(..excess);
        excess
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns currently held
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history holds no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Configured window size
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Removes every turn; a no-op on an empty history
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
