//! Conversation turns
//!
//! A turn is one message in the conversation, authored either by the
//! person asking questions or by the assistant.

use std::fmt;

/// One message in a conversation
///
/// Turns are immutable once created; the author is carried as the enum tag
/// rather than as a free-form role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// A question or remark from the user
    Human(String),
    /// A reply produced by the assistant (including apology messages)
    Assistant(String),
}

impl Turn {
    /// Creates a human turn
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::agent::Turn;
    ///
    /// let turn = Turn::human("Do you deliver?");
    /// assert!(turn.is_human());
    /// assert_eq!(turn.content(), "Do you deliver?");
    /// ```
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human(content.into())
    }

    /// Creates an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Text carried by this turn
    pub fn content(&self) -> &str {
        match self {
            Self::Human(text) | Self::Assistant(text) => text,
        }
    }

    /// Label used when the turn is written into a prompt transcript
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::agent::Turn;
    ///
    /// assert_eq!(Turn::human("hi").label(), "Human");
    /// assert_eq!(Turn::assistant("hello").label(), "Assistant");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Self::Human(_) => "Human",
            Self::Assistant(_) => "Assistant",
        }
    }

    /// Whether the user authored this turn
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human(_))
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.content())
    }
}
