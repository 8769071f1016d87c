//! # workman Core Library
//!
//! Business logic for the `workman` command-line tool: tracking work sessions
//! and keeping a to-do list with groups and deadlines. The CLI crate is a thin
//! layer that parses arguments, calls into this library and prints reports.
//!
//! ## Architecture
//!
//! - **Storage**: JSON stores with atomic replace and a TOML configuration
//! - **Session**: persisted running/idle record, start/stop/status
//! - **Work log**: seconds per date, weekly totals, retention pruning
//! - **To-do**: items with stable ids, projected to display ids per call
//! - **Notifier**: overdue / due-soon scan over the to-do list
//!
//! ## Key Components
//!
//! - [`SessionTracker`]: session state machine over the stores
//! - [`WorkLog`]: per-date aggregation
//! - [`TodoList`]: to-do CRUD
//! - [`Config`]: application configuration

pub mod error;
pub mod notifier;
pub mod session;
pub mod storage;
pub mod todo;
pub mod worklog;

pub use error::{CoreError, HookError, StorageError, ValidationError};
pub use notifier::{Alert, DeadlineReport};
pub use session::hook::{AutoStopHook, NoopHook, SystemdHook};
pub use session::{SessionState, SessionStatus, SessionTracker, StartReport, StopReport, TrackerSettings};
pub use storage::{Config, JsonStore, Stores};
pub use todo::{DeadlineEdit, TodoEdit, TodoItem, TodoList};
pub use worklog::{ClosedSession, DayTotal, PruneSummary, WeeklyReport, WorkLog};
