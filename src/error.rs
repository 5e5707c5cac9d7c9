// error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("'{0}' is not a valid number")]
    Parse(String),

    #[error("Unknown operation: {name}. Available operations: {available}")]
    InvalidOperation { name: String, available: String },

    #[error("{0}")]
    Domain(String),

    #[error("Input value {value} exceeds maximum allowed value {max}")]
    InputOutOfRange { value: f64, max: f64 },

    #[error("{command} requires {expected} arguments, got {got}")]
    ArgumentCount {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("Nothing to undo.")]
    NothingToUndo,

    #[error("Nothing to redo.")]
    NothingToRedo,

    #[error("Unknown command: {0}. Type 'help' for available commands.")]
    UnknownCommand(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl CalcError {
    /// Undo/redo misses are reported, not treated as failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, CalcError::NothingToUndo | CalcError::NothingToRedo)
    }
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path}, line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CalcError>;
