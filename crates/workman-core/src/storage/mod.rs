mod config;
pub mod store;

pub use config::{AutoStopConfig, Config, LogConfig, TodoConfig};
pub use store::JsonStore;

use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::session::SessionState;
use crate::todo::TodoList;
use crate::worklog::WorkLog;

pub const SESSION_FILE: &str = "session.json";
pub const WORK_LOG_FILE: &str = "work_log.json";
pub const TODOS_FILE: &str = "todos.json";
pub const CONFIG_FILE: &str = "config.toml";

/// Returns `~/.config/workman[-dev]/` based on WORKMAN_ENV.
///
/// Set WORKMAN_ENV=dev to use development data directory.
/// WORKMAN_HOME, when set, replaces the directory entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("WORKMAN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("WORKMAN_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("workman-dev")
            } else {
                base_dir.join("workman")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// The three JSON stores of one data directory.
pub struct Stores {
    pub session: JsonStore<SessionState>,
    pub log: JsonStore<WorkLog>,
    pub todos: JsonStore<TodoList>,
}

impl Stores {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            session: JsonStore::in_dir(dir, SESSION_FILE),
            log: JsonStore::in_dir(dir, WORK_LOG_FILE),
            todos: JsonStore::in_dir(dir, TODOS_FILE),
        }
    }
}
