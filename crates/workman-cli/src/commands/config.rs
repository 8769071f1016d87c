use clap::Subcommand;
use workman_core::{Config, CoreError, ValidationError};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "log.retention_months", "auto_stop.enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), CoreError> {
    let ctx = Context::open()?;

    match action {
        ConfigAction::Get { key } => match ctx.config.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                return Err(ValidationError::InvalidValue {
                    field: key,
                    message: "unknown config key".to_string(),
                }
                .into())
            }
        },
        ConfigAction::Set { key, value } => {
            let mut config = ctx.config;
            config.set(&key, &value)?;
            config.save_to(&ctx.dir)?;
            println!("ok");
        }
        ConfigAction::List => print_json(&ctx.config)?,
        ConfigAction::Reset => {
            Config::default().save_to(&ctx.dir)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
