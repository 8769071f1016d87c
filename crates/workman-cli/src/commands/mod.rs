pub mod config;
pub mod log;
pub mod session;
pub mod todo;

use std::path::PathBuf;

use workman_core::storage::data_dir;
use workman_core::{Config, CoreError, Stores};

/// Everything a command needs: the data directory, its config and stores.
pub struct Context {
    pub dir: PathBuf,
    pub config: Config,
    pub stores: Stores,
}

impl Context {
    pub fn open() -> Result<Self, CoreError> {
        let dir = data_dir()?;
        let config = Config::load_from(&dir)?;
        let stores = Stores::in_dir(&dir);
        tracing::debug!(dir = %dir.display(), "opened data directory");
        Ok(Self {
            dir,
            config,
            stores,
        })
    }
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CoreError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
