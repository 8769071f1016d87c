//! Stop-on-shutdown hook.
//!
//! While a session runs, a systemd user unit is enabled whose stop action
//! runs `workman stop`, so logging out or shutting down closes the session.
//! The tracker only sees the [`AutoStopHook`] trait; failures are warnings.

use std::process::Command;

use crate::error::HookError;
use crate::storage::AutoStopConfig;

pub trait AutoStopHook {
    /// Arm the hook when a session starts.
    fn enable(&self) -> Result<(), HookError>;
    /// Disarm the hook when a session stops.
    fn disable(&self) -> Result<(), HookError>;
}

/// `systemctl --user` toggling of a unit.
#[derive(Debug, Clone)]
pub struct SystemdHook {
    unit: String,
}

impl SystemdHook {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn systemctl(&self, args: &[&str]) -> Result<(), HookError> {
        let command = format!("systemctl --user {} {}", args.join(" "), self.unit);
        tracing::debug!(%command, "toggling auto-stop unit");

        let output = Command::new("systemctl")
            .arg("--user")
            .args(args)
            .arg(&self.unit)
            .output()
            .map_err(|source| HookError::Spawn {
                program: "systemctl".to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(HookError::Failed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl AutoStopHook for SystemdHook {
    fn enable(&self) -> Result<(), HookError> {
        self.systemctl(&["enable", "--now"])
    }

    fn disable(&self) -> Result<(), HookError> {
        // The unit's stop action runs `workman stop`, which lands here again;
        // waiting on the stop job from inside it would block until timeout.
        self.systemctl(&["stop", "--no-block"])?;
        self.systemctl(&["disable"])
    }
}

/// Used when the hook is switched off in the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl AutoStopHook for NoopHook {
    fn enable(&self) -> Result<(), HookError> {
        Ok(())
    }

    fn disable(&self) -> Result<(), HookError> {
        Ok(())
    }
}

/// Pick the hook implementation for `config`.
pub fn from_config(config: &AutoStopConfig) -> Box<dyn AutoStopHook> {
    if config.enabled {
        Box::new(SystemdHook::new(config.unit.clone()))
    } else {
        Box::new(NoopHook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_noop() {
        let config = AutoStopConfig {
            enabled: false,
            unit: "whatever.service".into(),
        };
        let hook = from_config(&config);
        assert!(hook.enable().is_ok());
        assert!(hook.disable().is_ok());
    }

    #[test]
    fn systemd_hook_keeps_unit_name() {
        let hook = SystemdHook::new("work-manager.service");
        assert_eq!(hook.unit(), "work-manager.service");
    }
}
