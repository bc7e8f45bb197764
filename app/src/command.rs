//! Line commands for the interactive binary.
//!
//! A line starting with `:` is a command; anything else is typed into the
//! input widget and confirmed.

use crate::app::UiEvent;
use crate::widgets::Key;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
commands:
  <text>            add a todo titled <text>
  :toggle N         toggle todo N
  :assign N ID      assign todo N to user ID
  :rm N             remove todo N
  :all              toggle every todo at once
  :send JSON        send a raw update request
  :help             show this help
  :quit             exit";

/// A parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Events to deliver to the app, in order
    Events(Vec<UiEvent>),
    /// Show help
    Help,
    /// Exit
    Quit,
}

/// Error returned for a line that is not a valid command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command name is not known
    #[error("unknown command :{0} (try :help)")]
    Unknown(String),

    /// A required argument is missing
    #[error(":{command} expects {expected}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the expected arguments
        expected: &'static str,
    },

    /// An index argument is not a non-negative integer
    #[error("invalid index {0:?}")]
    InvalidIndex(String),
}

/// Parse one REPL line
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands and bad arguments.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Events(vec![
            UiEvent::DraftChanged(line.to_string()),
            UiEvent::Key(Key::Enter),
        ]));
    };

    let (name, args) = rest
        .trim()
        .split_once(char::is_whitespace)
        .map_or((rest.trim(), ""), |(name, args)| (name, args.trim()));

    let event = match name {
        "help" | "h" => return Ok(Command::Help),
        "quit" | "q" => return Ok(Command::Quit),
        "toggle" | "t" => UiEvent::Toggle(index_arg(args, "toggle", "an index")?),
        "rm" | "remove" => UiEvent::Remove(index_arg(args, "rm", "an index")?),
        "all" => UiEvent::ToggleAll,
        "assign" | "a" => {
            let (index, user) = args.split_once(char::is_whitespace).ok_or(
                CommandError::MissingArgument {
                    command: "assign",
                    expected: "an index and a user id",
                },
            )?;
            UiEvent::Assign {
                index: index_arg(index, "assign", "an index and a user id")?,
                value: user.trim().to_string(),
            }
        },
        "send" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "send",
                    expected: "a JSON update request",
                });
            }
            UiEvent::Raw(args.to_string())
        },
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Command::Events(vec![event]))
}

fn index_arg(
    value: &str,
    command: &'static str,
    expected: &'static str,
) -> Result<usize, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    value
        .parse()
        .map_err(|_| CommandError::InvalidIndex(value.to_string()))
}
