//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work log retention and automatic pruning
//! - To-do defaults and the deadline warning window
//! - The auto-stop (stop-on-shutdown) service hook
//!
//! Configuration is stored at `~/.config/workman/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::store::write_atomic;
use super::CONFIG_FILE;
use crate::error::{CoreError, StorageError, ValidationError};

/// Work log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Entries older than this many months are removed by `log prune`.
    #[serde(default = "default_retention_months")]
    pub retention_months: u32,
    /// Prune with `retention_months` after every `stop`.
    #[serde(default)]
    pub auto_prune: bool,
}

/// To-do configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoConfig {
    #[serde(default = "default_group")]
    pub default_group: String,
    /// Deadlines within this many days from today are reported as due soon.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
}

/// Stop-on-shutdown service hook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoStopConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// systemd user unit that runs `workman stop` on logout/shutdown.
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/workman/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub todo: TodoConfig,
    #[serde(default)]
    pub auto_stop: AutoStopConfig,
}

// Default functions
fn default_retention_months() -> u32 {
    6
}
fn default_group() -> String {
    "General".into()
}
fn default_due_soon_days() -> u32 {
    2
}
fn default_true() -> bool {
    true
}
fn default_unit() -> String {
    "work-manager.service".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            retention_months: default_retention_months(),
            auto_prune: false,
        }
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            default_group: default_group(),
            due_soon_days: default_due_soon_days(),
        }
    }
}

impl Default for AutoStopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            unit: default_unit(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ValidationError> {
        let invalid = |message: String| ValidationError::InvalidValue {
            field: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(invalid("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown config key".into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| invalid("unknown config key".into()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) => {
                        return Err(invalid("key names a section, not a value".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| invalid("unknown config key".into()))?;
        }

        Err(invalid("unknown config key".into()))
    }

    /// Load from `dir/config.toml`, writing defaults if the file is absent.
    ///
    /// An unparseable file (bad TOML or not UTF-8) is logged and replaced by
    /// defaults in memory; the file itself is left untouched so it can be
    /// fixed by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if the
    /// default config cannot be written to disk.
    pub fn load_from(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(CONFIG_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                return Ok(cfg);
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<Config>(content).map_err(|e| e.to_string()));
        match parsed {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config is invalid, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Persist to `dir/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, dir: &Path) -> Result<(), StorageError> {
        let path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&path, content.as_bytes())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory. The caller persists.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the type of the existing field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let invalid = |message: String| ValidationError::InvalidValue {
            field: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.log.retention_months, 6);
        assert!(!parsed.log.auto_prune);
        assert_eq!(parsed.todo.default_group, "General");
        assert_eq!(parsed.todo.due_soon_days, 2);
        assert_eq!(parsed.auto_stop.unit, "work-manager.service");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[log]\nretention_months = 3\n").unwrap();
        assert_eq!(parsed.log.retention_months, 3);
        assert!(parsed.auto_stop.enabled);
        assert_eq!(parsed.todo.due_soon_days, 2);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("log.retention_months").as_deref(), Some("6"));
        assert_eq!(cfg.get("auto_stop.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("todo.default_group").as_deref(), Some("General"));
        assert!(cfg.get("log.missing_key").is_none());
        assert!(cfg.get("log").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("log.retention_months", "12").unwrap();
        cfg.set("auto_stop.enabled", "false").unwrap();
        cfg.set("todo.default_group", "Inbox").unwrap();
        assert_eq!(cfg.log.retention_months, 12);
        assert!(!cfg.auto_stop.enabled);
        assert_eq!(cfg.todo.default_group, "Inbox");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("log.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("auto_stop.enabled", "not_a_bool").is_err());
        assert!(cfg.set("log.retention_months", "-3").is_err());
        assert!(cfg.set("log", "1").is_err());
        assert_eq!(cfg.log.retention_months, 6);
    }

    #[test]
    fn load_from_writes_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(dir.path()).unwrap();
        assert_eq!(cfg.log.retention_months, 6);
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn load_from_tolerates_garbage() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "this is = = not toml").unwrap();
        let cfg = Config::load_from(dir.path()).unwrap();
        assert_eq!(cfg.todo.default_group, "General");
    }

    #[test]
    fn load_from_keeps_non_utf8_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut content = b"# caf".to_vec();
        content.push(0xE9);
        content.extend_from_slice(b"\n[log]\nretention_months = 24\n");
        std::fs::write(&path, &content).unwrap();

        let cfg = Config::load_from(dir.path()).unwrap();
        assert_eq!(cfg.log.retention_months, 6);
        assert_eq!(std::fs::read(&path).unwrap(), content);
    }

    #[test]
    fn load_from_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(StorageError::Read { .. })
        ));
        assert!(dir.path().join(CONFIG_FILE).is_dir());
    }

    #[test]
    fn save_to_then_load_from() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.auto_stop.enabled = false;
        cfg.todo.due_soon_days = 5;
        cfg.save_to(dir.path()).unwrap();

        let loaded = Config::load_from(dir.path()).unwrap();
        assert!(!loaded.auto_stop.enabled);
        assert_eq!(loaded.todo.due_soon_days, 5);
    }
}
