//! Work log: accumulated seconds per calendar date.
//!
//! Completed sessions are folded into one [`LogEntry`] per date. The log is
//! the only input for the weekly report and the only thing pruning touches.
//!
//! The log also remembers the last session it absorbed. A `stop` killed after
//! the log was saved but before the session record was cleared replays the
//! same session; [`WorkLog::close_session`] recognises it and adds nothing.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Work attributed to one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub total_seconds: u64,
    /// Number of completed sessions folded into `total_seconds`.
    #[serde(default)]
    pub sessions: u32,
}

/// A session already folded into the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedSession {
    pub started_at: DateTime<Local>,
    pub logged_on: NaiveDate,
    pub seconds: u64,
}

/// The persisted log, keyed by date (at most one entry per date).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLog {
    #[serde(default)]
    entries: BTreeMap<NaiveDate, LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_closed: Option<ClosedSession>,
}

/// One row of the weekly breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub seconds: u64,
    pub sessions: u32,
}

/// Sum of one Monday..Sunday week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_seconds: u64,
    /// Days with recorded work, ascending.
    pub days: Vec<DayTotal>,
}

impl WeeklyReport {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Outcome of a prune pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    pub cutoff: NaiveDate,
    pub months: u32,
    pub removed: usize,
}

impl WorkLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `seconds` of work to `date`.
    pub fn record(&mut self, date: NaiveDate, seconds: u64) {
        let entry = self.entries.entry(date).or_default();
        entry.total_seconds = entry.total_seconds.saturating_add(seconds);
        entry.sessions = entry.sessions.saturating_add(1);
    }

    /// Record the session that started at `started_at` under its start date.
    ///
    /// Returns the recorded session and whether it was new. Closing the most
    /// recently closed session again changes nothing and returns what was
    /// recorded the first time.
    pub fn close_session(
        &mut self,
        started_at: DateTime<Local>,
        seconds: u64,
    ) -> (ClosedSession, bool) {
        if let Some(closed) = self.last_closed.filter(|c| c.started_at == started_at) {
            return (closed, false);
        }

        let closed = ClosedSession {
            started_at,
            logged_on: started_at.date_naive(),
            seconds,
        };
        self.record(closed.logged_on, seconds);
        self.last_closed = Some(closed);
        (closed, true)
    }

    pub fn last_closed(&self) -> Option<&ClosedSession> {
        self.last_closed.as_ref()
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&LogEntry> {
        self.entries.get(&date)
    }

    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &LogEntry)> {
        self.entries.iter().map(|(d, e)| (*d, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total for the week containing `today`, shifted by `week_offset` weeks
    /// (0 = current week, -1 = previous week).
    pub fn weekly_total(&self, today: NaiveDate, week_offset: i64) -> WeeklyReport {
        let (week_start, week_end) = week_bounds(today, week_offset);

        let days: Vec<DayTotal> = self
            .entries
            .range(week_start..=week_end)
            .map(|(date, entry)| DayTotal {
                date: *date,
                seconds: entry.total_seconds,
                sessions: entry.sessions,
            })
            .collect();
        let total_seconds = days.iter().map(|d| d.seconds).sum();

        WeeklyReport {
            week_start,
            week_end,
            total_seconds,
            days,
        }
    }

    /// Remove entries strictly older than `today - months`.
    pub fn prune(&mut self, today: NaiveDate, months: u32) -> PruneSummary {
        let cutoff = prune_cutoff(today, months);
        let before = self.entries.len();
        self.entries.retain(|date, _| *date >= cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(%cutoff, removed, "pruned work log");
        }
        PruneSummary {
            cutoff,
            months,
            removed,
        }
    }
}

/// Monday and Sunday of the week containing `today`, shifted by `week_offset`.
pub fn week_bounds(today: NaiveDate, week_offset: i64) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start = monday + Duration::weeks(week_offset);
    (start, start + Duration::days(6))
}

/// Oldest date kept by a prune of `months` calendar months.
///
/// Month arithmetic clamps to the end of the month (May 31 - 3 months is
/// Feb 28/29).
pub fn prune_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
