//! Work session tracking.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//! ```
//!
//! The running/idle state is a single persisted [`SessionState`] record that
//! is loaded, changed and saved by each command; there is no in-process state.
//!
//! On `stop` the duration is written to the work log *before* the session
//! record is cleared. If the process is killed in between, the session is
//! still running on the next invocation; the next `stop` finds it already in
//! the log, keeps the duration recorded the first time and only clears the
//! record. A session is never lost and never counted twice.
//!
//! A session that spans midnight is attributed entirely to its start date.

pub mod hook;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::notifier::{self, DeadlineReport};
use crate::storage::{Config, Stores};
use crate::worklog::PruneSummary;
use hook::AutoStopHook;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persisted singleton. `started_at` is present iff `running`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Local>>,
}

impl SessionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn running_since(at: DateTime<Local>) -> Self {
        Self {
            running: true,
            started_at: Some(at),
        }
    }

    /// Repair a record whose flags disagree. The timestamp wins: a running
    /// flag without a start time cannot be stopped meaningfully.
    pub fn normalized(self) -> Self {
        match self.started_at {
            Some(at) => Self::running_since(at),
            None => Self::idle(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

/// Answer to `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running {
        started_at: DateTime<Local>,
        elapsed_seconds: u64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StartReport {
    pub started_at: DateTime<Local>,
    pub deadlines: DeadlineReport,
    /// Set when the auto-stop hook could not be enabled.
    pub hook_warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopReport {
    pub started_at: DateTime<Local>,
    pub stopped_at: DateTime<Local>,
    pub duration_seconds: u64,
    /// Log date that received the duration.
    pub logged_on: NaiveDate,
    /// Present when automatic pruning is configured.
    pub pruned: Option<PruneSummary>,
    /// Set when the auto-stop hook could not be disabled.
    pub hook_warning: Option<String>,
}

/// Knobs the tracker reads from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub due_soon_days: u32,
    /// Retention to prune with after each stop, if any.
    pub auto_prune_months: Option<u32>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            due_soon_days: notifier::DUE_SOON_DAYS,
            auto_prune_months: None,
        }
    }
}

impl From<&Config> for TrackerSettings {
    fn from(config: &Config) -> Self {
        Self {
            due_soon_days: config.todo.due_soon_days,
            auto_prune_months: config.log.auto_prune.then_some(config.log.retention_months),
        }
    }
}

/// Seconds from `from` to `to`, zero if the clock went backwards.
pub fn elapsed_seconds(from: DateTime<Local>, to: DateTime<Local>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

/// Start/stop/status over the persisted stores.
pub struct SessionTracker<'a> {
    stores: &'a Stores,
    hook: &'a dyn AutoStopHook,
    settings: TrackerSettings,
}

impl<'a> SessionTracker<'a> {
    pub fn new(stores: &'a Stores, hook: &'a dyn AutoStopHook, settings: TrackerSettings) -> Self {
        Self {
            stores,
            hook,
            settings,
        }
    }

    fn load_state(&self) -> Result<SessionState> {
        Ok(self.stores.session.load()?.normalized())
    }

    /// Idle -> Running.
    ///
    /// # Errors
    /// `AlreadyRunning` (state untouched) or a storage failure.
    pub fn start(&self, now: DateTime<Local>) -> Result<StartReport> {
        if let Some(started_at) = self.load_state()?.started_at {
            return Err(CoreError::AlreadyRunning {
                started_at: started_at.format(TIMESTAMP_FORMAT).to_string(),
            });
        }

        let todos = self.stores.todos.load()?;
        let deadlines = notifier::scan(&todos, now.date_naive(), self.settings.due_soon_days);

        self.stores.session.save(&SessionState::running_since(now))?;
        tracing::info!(started_at = %now, "session started");

        let hook_warning = self.hook.enable().err().map(|e| {
            tracing::warn!(error = %e, "could not enable auto-stop hook");
            e.to_string()
        });

        Ok(StartReport {
            started_at: now,
            deadlines,
            hook_warning,
        })
    }

    /// Running -> Idle, recording the duration under the start date.
    ///
    /// When idle the hook is still disabled, so a stale hook left by a crashed
    /// run does not linger.
    ///
    /// # Errors
    /// `NotRunning` or a storage failure.
    pub fn stop(&self, now: DateTime<Local>) -> Result<StopReport> {
        let Some(started_at) = self.load_state()?.started_at else {
            if let Err(e) = self.hook.disable() {
                tracing::debug!(error = %e, "auto-stop hook not disabled while idle");
            }
            return Err(CoreError::NotRunning);
        };

        let mut log = self.stores.log.load()?;
        let (closed, new) = log.close_session(started_at, elapsed_seconds(started_at, now));
        if !new {
            tracing::warn!(%started_at, "session was already logged, finishing an interrupted stop");
        }
        let duration_seconds = closed.seconds;
        let logged_on = closed.logged_on;
        let pruned = self
            .settings
            .auto_prune_months
            .map(|months| log.prune(now.date_naive(), months));
        self.stores.log.save(&log)?;

        self.stores.session.save(&SessionState::idle())?;
        tracing::info!(duration_seconds, %logged_on, "session stopped");

        let hook_warning = self.hook.disable().err().map(|e| {
            tracing::warn!(error = %e, "could not disable auto-stop hook");
            e.to_string()
        });

        Ok(StopReport {
            started_at,
            stopped_at: now,
            duration_seconds,
            logged_on,
            pruned,
            hook_warning,
        })
    }

    /// Read-only view of the current state.
    pub fn status(&self, now: DateTime<Local>) -> Result<SessionStatus> {
        Ok(match self.load_state()?.started_at {
            Some(started_at) => SessionStatus::Running {
                started_at,
                elapsed_seconds: elapsed_seconds(started_at, now),
            },
            None => SessionStatus::Idle,
        })
    }
}
