//! Prompt assembly for review-grounded answers
//!
//! Builds the single text block sent to the model: a fixed instruction,
//! the retrieved reviews, the serialized chat history and the question.
//! Prompt length is bounded only by the history window.

use crate::agent::Turn;

/// Instruction placed at the top of every prompt
pub const PREAMBLE: &str = "You are an expert in answering questions about a pizza restaurant.";

/// Serializes history as `Human: …` / `Assistant: …` lines
///
/// Every turn becomes one line terminated by a newline, in history order.
///
/// # Examples
///
/// ```
/// use pizza_assistant::agent::Turn;
/// use pizza_assistant::prompts::render_history;
///
/// let turns = vec![Turn::human("Open late?"), Turn::assistant("Until 11pm.")];
/// assert_eq!(render_history(&turns), "Human: Open late?\nAssistant: Until 11pm.\n");
/// ```
pub fn render_history(history: &[Turn]) -> String {
    history.iter().map(|turn| format!("{}\n", turn)).collect()
}

/// Builds the prompt for one question
///
/// # Arguments
///
/// * `context` - Retrieved review texts (or the fallback placeholder), joined as-is
/// * `history` - Current conversation history, oldest first
/// * `question` - The question being answered
///
/// # Examples
///
/// ```
/// use pizza_assistant::agent::Turn;
/// use pizza_assistant::prompts::assemble;
///
/// let context = vec!["Great crust".to_string()];
/// let history = vec![Turn::human("How is the crust?")];
/// let prompt = assemble(&context, &history, "How is the crust?");
///
/// assert!(prompt.starts_with("You are an expert"));
/// assert!(prompt.contains("Here are some relevant reviews: Great crust"));
/// assert!(prompt.contains("Human: How is the crust?"));
/// assert!(prompt.ends_with("Here is the question to answer: How is the crust?\n"));
/// ```
pub fn assemble(context: &[String], history: &[Turn], question: &str) -> String {
    format!(
        "{preamble}\n\nHere are some relevant reviews: {reviews}\n\nChat history:\n{history}\nHere is the question to answer: {question}\n",
        preamble = PREAMBLE,
        reviews = context.join("\n"),
        history = render_history(history),
        question = question,
    )
}
