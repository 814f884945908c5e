//! Line-oriented command interpreter
//!
//! Each input line is parsed into a [`Command`] and run against a
//! [`GraphCollection`]. The interpreter never touches stdin or stdout; the
//! binary owns all terminal I/O and decides how a [`CommandOutput`] is shown.

pub mod command;
pub mod config;
pub mod session;

pub use command::Command;
pub use config::ShellConfig;
pub use session::{Session, SharedCollection};

use crate::codec::CodecError;
use crate::collection::GraphCollection;
use crate::graph::GraphError;
use serde::Serialize;
use thiserror::Error;

/// Shell errors
#[derive(Error, Debug)]
pub enum ShellError {
    /// Command recognised but its arguments do not fit the grammar
    #[error("Usage: {0}")]
    Usage(String),

    #[error("Unknown command '{0}', type HELP for a list of commands")]
    UnknownCommand(String),

    /// A mutating command was run through the read-only path
    #[error("{0} modifies the collection and needs write access")]
    ReadOnly(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type ShellResult<T> = Result<T, ShellError>;

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CommandOutput {
    /// Nothing to show
    Empty,

    /// Acknowledgement of a mutation
    Message { text: String },

    /// A single-column listing
    Rows { column: String, rows: Vec<String> },
}

impl CommandOutput {
    pub fn message(text: impl Into<String>) -> Self {
        CommandOutput::Message { text: text.into() }
    }

    pub fn rows<I, S>(column: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandOutput::Rows {
            column: column.to_string(),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Plain-text rendering, one entry per line
    pub fn lines(&self) -> Vec<String> {
        match self {
            CommandOutput::Empty => Vec::new(),
            CommandOutput::Message { text } => vec![text.clone()],
            CommandOutput::Rows { rows, .. } => rows.clone(),
        }
    }
}

/// Parse and run one line against `collection`
///
/// Blank lines produce [`CommandOutput::Empty`].
pub fn handle(collection: &mut GraphCollection, line: &str) -> ShellResult<CommandOutput> {
    match Command::parse(line)? {
        Some(command) => command.execute(collection),
        None => Ok(CommandOutput::Empty),
    }
}
