//! Integration tests for the to-do store persisted through JSON.

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use workman_core::notifier::{scan, DUE_SOON_DAYS};
use workman_core::{DeadlineEdit, Stores, TodoEdit};

fn created(n: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_751_000_000 + n, 0).unwrap()
}

#[test]
fn test_add_list_persists_order() {
    let dir = TempDir::new().unwrap();
    let stores = Stores::in_dir(dir.path());

    let mut todos = stores.todos.load().unwrap();
    todos.add("no deadline", "Work", None, created(0)).unwrap();
    todos.add("later", "Work", Some("2025-08-01"), created(1)).unwrap();
    todos.add("report", "Work", Some("2025-07-10"), created(2)).unwrap();
    stores.todos.save(&todos).unwrap();

    let reloaded = stores.todos.load().unwrap();
    let rows: Vec<_> = reloaded
        .list()
        .map(|l| (l.display_id, l.item.text.as_str(), l.item.group.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, "report", "Work"),
            (2, "later", "Work"),
            (3, "no deadline", "Work"),
        ]
    );
}

#[test]
fn test_edit_and_remove_across_reloads() {
    let dir = TempDir::new().unwrap();
    let stores = Stores::in_dir(dir.path());

    let mut todos = stores.todos.load().unwrap();
    for (i, text) in ["one", "two", "three", "four", "five"].iter().enumerate() {
        todos.add(text, "General", None, created(i as i64)).unwrap();
    }
    stores.todos.save(&todos).unwrap();

    let mut todos = stores.todos.load().unwrap();
    todos
        .edit(
            2,
            TodoEdit {
                deadline: DeadlineEdit::parse(Some("2025-07-11")).unwrap(),
                ..TodoEdit::default()
            },
        )
        .unwrap();
    stores.todos.save(&todos).unwrap();

    // "two" now has a deadline and moves to the front.
    let mut todos = stores.todos.load().unwrap();
    assert_eq!(todos.list().next().unwrap().item.text, "two");
    let removed = todos.remove(3).unwrap();
    assert_eq!(removed.text, "three");
    stores.todos.save(&todos).unwrap();

    let todos = stores.todos.load().unwrap();
    let ids: Vec<_> = todos.list().map(|l| l.display_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    let stable: Vec<_> = todos.items().iter().map(|i| i.id).collect();
    assert_eq!(stable, vec![1, 2, 4, 5]);
}

#[test]
fn test_scan_persisted_items() {
    let dir = TempDir::new().unwrap();
    let stores = Stores::in_dir(dir.path());

    let mut todos = stores.todos.load().unwrap();
    todos.add("tomorrow", "A", Some("2025-07-11"), created(0)).unwrap();
    todos.add("yesterday", "B", Some("2025-07-09"), created(1)).unwrap();
    stores.todos.save(&todos).unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
    let report = scan(&stores.todos.load().unwrap(), today, DUE_SOON_DAYS);
    let order: Vec<_> = report.alerts().map(|a| a.text.as_str()).collect();
    assert_eq!(order, vec!["yesterday", "tomorrow"]);
    assert_eq!(report.overdue.len(), 1);
    assert_eq!(report.due_soon.len(), 1);
}
