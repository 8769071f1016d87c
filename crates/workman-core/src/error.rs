//! Core error types for workman-core.
//!
//! Every operation in the library returns [`CoreError`]. The CLI catches it
//! once at the dispatch boundary and maps it to a message and an exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workman-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad input shape (empty text, malformed date, ...)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Display id does not resolve to a to-do item
    #[error("No to-do with id {id} (there are {len}). Use 'todo list' to see available ids.")]
    NotFound { id: usize, len: usize },

    /// `start` while a session is already running
    #[error("A work session is already running (started at {started_at}). Use 'stop' to end it first.")]
    AlreadyRunning { started_at: String },

    /// `stop` while no session is running
    #[error("No active work session to stop.")]
    NotRunning,

    /// Filesystem failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Serialization of a report failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Validation(_) => 2,
            CoreError::NotFound { .. } => 3,
            CoreError::AlreadyRunning { .. } => 4,
            CoreError::NotRunning => 5,
            CoreError::Storage(_) => 6,
            CoreError::Json(_) => 1,
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text is empty after trimming
    #[error("Task text must not be empty")]
    EmptyText,

    /// Deadline is not a `YYYY-MM-DD` calendar date
    #[error("Invalid deadline '{0}'. Please use YYYY-MM-DD (or 'none' to clear it).")]
    InvalidDate(String),

    /// `todo edit` without any field to change
    #[error("Nothing to edit: pass at least one of --task, --group, --deadline")]
    NothingToEdit,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Data directory could not be determined or created
    #[error("Cannot use data directory {path}: {source}. Check that it exists and is writable.")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a store file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or replace a store file
    #[error("Failed to write {path}: {source}. Check permissions of the data directory.")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize data before writing
    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

/// Auto-stop hook errors. Reported as warnings, never propagated.
#[derive(Error, Debug)]
pub enum HookError {
    /// The service manager binary could not be run
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The service manager ran but reported failure
    #[error("`{command}` failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
