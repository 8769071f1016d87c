//! Plain-text rendering of core reports.
//!
//! Every function returns a `String`; the command handlers decide where it
//! goes. JSON output bypasses this module and serializes the reports directly.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;
use workman_core::{DeadlineReport, TodoList, WeeklyReport};

const RULE: &str = "-------------------------------------";

fn hours_minutes(seconds: u64) -> (u64, u64) {
    (seconds / 3600, (seconds % 3600) / 60)
}

/// `3 hours, 5 minutes`
pub fn duration_long(seconds: u64) -> String {
    let (h, m) = hours_minutes(seconds);
    format!("{h} hours, {m} minutes")
}

/// `03h 05m`
pub fn duration_short(seconds: u64) -> String {
    let (h, m) = hours_minutes(seconds);
    format!("{h:02}h {m:02}m")
}

fn due(deadline: Option<NaiveDate>) -> String {
    deadline
        .map(|d| format!(" (Due: {d})"))
        .unwrap_or_default()
}

pub fn todo_list(todos: &TodoList) -> String {
    if todos.is_empty() {
        return "Your to-do list is empty. Add one with 'todo add'.\n".to_string();
    }

    let mut out = String::new();
    let mut current_group: Option<&str> = None;
    for listed in todos.list() {
        let group = listed.item.group.as_str();
        if current_group != Some(group) {
            let _ = writeln!(out, "\n[{group}]");
            let _ = writeln!(out, "{}", "-".repeat(group.chars().count() + 2));
            current_group = Some(group);
        }
        let _ = writeln!(
            out,
            "  {}: {}{}",
            listed.display_id,
            listed.item.text,
            due(listed.item.deadline)
        );
    }
    out.push('\n');
    out
}

/// JSON row for `todo list --json`.
#[derive(Debug, Serialize)]
pub struct TodoRow<'a> {
    pub display_id: usize,
    pub id: u64,
    pub text: &'a str,
    pub group: &'a str,
    pub deadline: Option<NaiveDate>,
}

pub fn todo_rows(todos: &TodoList) -> Vec<TodoRow<'_>> {
    todos
        .list()
        .map(|l| TodoRow {
            display_id: l.display_id,
            id: l.item.id,
            text: &l.item.text,
            group: &l.item.group,
            deadline: l.item.deadline,
        })
        .collect()
}

/// Notification block; empty string when nothing is flagged.
pub fn deadlines(report: &DeadlineReport) -> String {
    if report.is_empty() {
        return String::new();
    }

    let mut out = String::from("\nDeadline Notifications\n----------------------------\n");
    if !report.overdue.is_empty() {
        out.push_str("OVERDUE TASKS:\n");
        for alert in &report.overdue {
            let _ = writeln!(
                out,
                "  - [{}] {} (Due: {})",
                alert.group, alert.text, alert.deadline
            );
        }
    }
    if !report.due_soon.is_empty() {
        if !report.overdue.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "UPCOMING TASKS (next {} days):", report.window_days);
        for alert in &report.due_soon {
            let _ = writeln!(
                out,
                "  - [{}] {} (Due: {})",
                alert.group, alert.text, alert.deadline
            );
        }
    }
    out.push_str("----------------------------\n");
    out
}

pub fn week(report: &WeeklyReport) -> String {
    let mut out = format!("\nWork log for week of {}\n\n", report.week_start);
    if report.is_empty() {
        out.push_str("No work sessions recorded for this week.\n");
        return out;
    }

    for day in &report.days {
        let _ = writeln!(
            out,
            "  - {}: {}",
            day.date.format("%A, %b %d"),
            duration_short(day.seconds)
        );
    }
    let _ = write!(
        out,
        "\n{RULE}\nWeekly Total: {}\n{RULE}\n",
        duration_long(report.total_seconds)
    );
    out
}
