//! Line commands understood by the `todomvc` binary.

use crate::types::{ParseFilterError, TodoId, VisibilityFilter};
use std::str::FromStr;
use thiserror::Error;

/// One parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`
    Add(String),
    /// `toggle <id>`
    Toggle(TodoId),
    /// `filter <all|active|completed>`
    Filter(VisibilityFilter),
    /// `list`
    List,
    /// `dump`: the state as JSON
    Dump,
    /// `metrics`: Prometheus exposition text
    Metrics,
    /// `help`
    Help,
    /// `quit` or `exit`
    Quit,
}

/// Errors from parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("empty command")]
    Empty,

    /// First word is not a command
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    /// Command needs an argument it did not get
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// `toggle` argument is not an id
    #[error("`{0}` is not a todo id")]
    BadId(String),

    /// `filter` argument is not a filter
    #[error(transparent)]
    BadFilter(#[from] ParseFilterError),
}

/// Usage text printed for `help`
pub const HELP: &str = "\
commands:
  add <text>                        add a todo
  toggle <id>                       flip a todo between active and completed
  filter <all|active|completed>     change which todos are listed
  list                              show visible todos and the footer
  dump                              print the state as JSON
  metrics                           print store metrics (needs TODOMVC_METRICS_ADDR)
  quit                              exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" if rest.is_empty() => Err(CommandError::MissingArgument("add")),
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" if rest.is_empty() => Err(CommandError::MissingArgument("toggle")),
            "toggle" => rest
                .parse::<u64>()
                .map(|id| Self::Toggle(TodoId::new(id)))
                .map_err(|_| CommandError::BadId(rest.to_string())),
            "filter" if rest.is_empty() => Err(CommandError::MissingArgument("filter")),
            "filter" => Ok(Self::Filter(rest.parse()?)),
            "list" | "ls" => Ok(Self::List),
            "dump" => Ok(Self::Dump),
            "metrics" => Ok(Self::Metrics),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}
