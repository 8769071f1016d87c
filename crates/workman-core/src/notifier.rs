//! Deadline scan over the to-do list.
//!
//! Pure: takes a snapshot and a date, returns a report. Run on `start` and by
//! `todo check`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::todo::TodoList;

/// Default look-ahead for "due soon", in days.
pub const DUE_SOON_DAYS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub display_id: usize,
    pub text: String,
    pub group: String,
    pub deadline: NaiveDate,
    /// Days from today to the deadline; negative when overdue.
    pub days_left: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineReport {
    pub today: NaiveDate,
    pub window_days: u32,
    pub overdue: Vec<Alert>,
    pub due_soon: Vec<Alert>,
}

impl DeadlineReport {
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.due_soon.is_empty()
    }

    /// Overdue alerts first, then due-soon ones.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.overdue.iter().chain(self.due_soon.iter())
    }
}

/// Partition items with deadlines into overdue (before `today`) and due soon
/// (`today..=today + window_days`). Each bucket is sorted by deadline; equal
/// deadlines keep display order.
pub fn scan(todos: &TodoList, today: NaiveDate, window_days: u32) -> DeadlineReport {
    let mut overdue = Vec::new();
    let mut due_soon = Vec::new();

    for listed in todos.list() {
        let Some(deadline) = listed.item.deadline else {
            continue;
        };
        let days_left = (deadline - today).num_days();
        let alert = Alert {
            display_id: listed.display_id,
            text: listed.item.text.clone(),
            group: listed.item.group.clone(),
            deadline,
            days_left,
        };
        if days_left < 0 {
            overdue.push(alert);
        } else if days_left <= i64::from(window_days) {
            due_soon.push(alert);
        }
    }

    overdue.sort_by_key(|a| a.deadline);
    due_soon.sort_by_key(|a| a.deadline);

    DeadlineReport {
        today,
        window_days,
        overdue,
        due_soon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
    }

    fn list_with(deadlines: &[(&str, Option<i64>)]) -> TodoList {
        let mut list = TodoList::new();
        for (i, (text, offset)) in deadlines.iter().enumerate() {
            let deadline = offset.map(|d| (today() + Duration::days(d)).to_string());
            let created = Utc.timestamp_opt(1_750_000_000 + i as i64, 0).unwrap();
            list.add(text, "General", deadline.as_deref(), created)
                .unwrap();
        }
        list
    }

    #[test]
    fn classifies_yesterday_and_tomorrow() {
        let list = list_with(&[("soon", Some(1)), ("late", Some(-1))]);
        let report = scan(&list, today(), DUE_SOON_DAYS);

        let order: Vec<_> = report.alerts().map(|a| a.text.as_str()).collect();
        assert_eq!(order, vec!["late", "soon"]);
        assert_eq!(report.overdue[0].days_left, -1);
        assert_eq!(report.due_soon[0].days_left, 1);
    }

    #[test]
    fn window_edges() {
        let list = list_with(&[
            ("today", Some(0)),
            ("edge", Some(2)),
            ("beyond", Some(3)),
            ("none", None),
        ]);
        let report = scan(&list, today(), DUE_SOON_DAYS);
        assert!(report.overdue.is_empty());
        let soon: Vec<_> = report.due_soon.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(soon, vec!["today", "edge"]);
    }

    #[test]
    fn buckets_sorted_by_deadline() {
        let list = list_with(&[
            ("b", Some(-2)),
            ("a", Some(-5)),
            ("d", Some(2)),
            ("c", Some(0)),
        ]);
        let report = scan(&list, today(), DUE_SOON_DAYS);
        let order: Vec<_> = report.alerts().map(|a| a.text.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn alerts_carry_display_ids() {
        let mut list = TodoList::new();
        let now = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
        list.add("work item", "Work", Some("2025-07-09"), now).unwrap();
        list.add("home item", "Home", None, now).unwrap();

        let report = scan(&list, today(), DUE_SOON_DAYS);
        assert_eq!(report.overdue[0].display_id, 2);
        assert_eq!(report.overdue[0].group, "Work");
    }

    #[test]
    fn empty_list_yields_empty_report() {
        let report = scan(&TodoList::new(), today(), DUE_SOON_DAYS);
        assert!(report.is_empty());
    }

    #[test]
    fn scanning_twice_is_idempotent() {
        let list = list_with(&[("late", Some(-3)), ("soon", Some(1))]);
        assert_eq!(
            scan(&list, today(), DUE_SOON_DAYS),
            scan(&list, today(), DUE_SOON_DAYS)
        );
    }
}
