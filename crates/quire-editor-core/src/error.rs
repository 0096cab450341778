//! Error types for the editing core.
//!
//! Editing commands never fail; these cover the surfaces around them:
//! loading preferences and persisting notes.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TextRange;

/// Errors that can occur outside of command execution.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preferences file could not be parsed.
    #[error("invalid preferences: {0}")]
    Config(#[from] toml::de::Error),

    /// The note's save hook rejected the text.
    #[error("failed to save note: {0}")]
    Save(String),

    /// A command name did not parse.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// A range does not fit the buffer.
    #[error("range {range:?} out of bounds for length {len}")]
    InvalidRange { range: TextRange, len: usize },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}
