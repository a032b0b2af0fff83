//! Special commands parser for interactive chat
//!
//! Lines starting with `/` are handled by the terminal instead of being sent
//! to the assistant. The bare words `q`, `quit` and `exit` also end the
//! session. Commands are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command does not take arguments but one was given
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Forget the conversation so far
    Clear,

    /// Print the turns currently kept in history
    History,

    /// Display help information
    Help,

    /// End the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be asked as a question.
    None,
}

/// Parse a user input line into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognised `/command` and
/// `CommandError::UnsupportedArgument` when a command is given an argument.
///
/// # Examples
///
/// ```
/// use pizza_assistant::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/clear").unwrap(), SpecialCommand::Clear);
/// assert_eq!(parse_special_command("q").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("Is the crust thin?").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/order").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    match lower.as_str() {
        "q" | "quit" | "exit" => return Ok(SpecialCommand::Exit),
        _ if !lower.starts_with('/') => return Ok(SpecialCommand::None),
        _ => {}
    }

    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let parsed = match command {
        "/clear" | "/reset" => SpecialCommand::Clear,
        "/history" => SpecialCommand::History,
        "/help" | "/?" => SpecialCommand::Help,
        "/exit" | "/quit" | "/q" => SpecialCommand::Exit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    if !arg.is_empty() {
        return Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        });
    }

    Ok(parsed)
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Ask anything about the restaurant; answers are based on customer reviews.

Special commands:
  /clear, /reset   - Forget the conversation so far
  /history         - Show the turns the assistant currently remembers
  /help, /?        - Show this help
  q, quit, exit    - Leave the chat (also /quit, Ctrl-D)
"#
    );
}
