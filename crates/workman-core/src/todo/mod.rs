//! To-do list with groups and optional deadlines.
//!
//! Items carry a stable id that is assigned once and never reused. Users never
//! see it: `todo list` numbers items 1..N in display order, and `rm`/`edit`
//! accept that number. The display order is a pure projection of the stored
//! items, recomputed on every call:
//!
//! 1. groups alphabetically,
//! 2. deadline ascending within a group (no deadline last),
//! 3. creation time, then stable id.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

pub const DEFAULT_GROUP: &str = "General";

/// Literal accepted by `todo edit --deadline` to clear a deadline.
pub const CLEAR_DEADLINE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u64,
    pub text: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

/// The persisted to-do store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Next stable id to hand out. Kept even when the newest item is removed.
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    items: Vec<TodoItem>,
    /// Group for blank group input. Taken from the config, never persisted.
    #[serde(skip)]
    default_group: Option<String>,
}

/// An item together with the number `todo list` shows for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listed<'a> {
    pub display_id: usize,
    pub item: &'a TodoItem,
}

/// How `edit` treats the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadlineEdit {
    #[default]
    Keep,
    Clear,
    Set(NaiveDate),
}

impl DeadlineEdit {
    /// `None` keeps the deadline, `"none"` clears it, anything else must be a date.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        match raw {
            None => Ok(DeadlineEdit::Keep),
            Some(s) if s.trim().eq_ignore_ascii_case(CLEAR_DEADLINE) => Ok(DeadlineEdit::Clear),
            Some(s) => parse_deadline(s).map(DeadlineEdit::Set),
        }
    }
}

/// Fields to change on an existing item. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoEdit {
    pub text: Option<String>,
    pub group: Option<String>,
    pub deadline: DeadlineEdit,
}

impl TodoEdit {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.group.is_none() && self.deadline == DeadlineEdit::Keep
    }
}

/// Parse a `YYYY-MM-DD` deadline.
pub fn parse_deadline(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn clean_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}

fn display_cmp(a: &TodoItem, b: &TodoItem) -> Ordering {
    a.group
        .cmp(&b.group)
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Use `group` wherever a blank group is given. A blank `group` keeps
    /// [`DEFAULT_GROUP`].
    pub fn with_default_group(mut self, group: &str) -> Self {
        let group = group.trim();
        self.default_group = (!group.is_empty()).then(|| group.to_string());
        self
    }

    fn clean_group(&self, group: &str) -> String {
        let group = group.trim();
        if group.is_empty() {
            self.default_group.clone().unwrap_or_else(default_group)
        } else {
            group.to_string()
        }
    }

    /// Stored items in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    fn allocate_id(&mut self) -> u64 {
        let after_existing = self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(after_existing).max(1);
        self.next_id = id + 1;
        id
    }

    /// Indices into `items`, in display order.
    fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| display_cmp(&self.items[a], &self.items[b]));
        order
    }

    fn resolve(&self, display_id: usize) -> Result<usize> {
        let order = self.display_order();
        display_id
            .checked_sub(1)
            .and_then(|i| order.get(i).copied())
            .ok_or(CoreError::NotFound {
                id: display_id,
                len: order.len(),
            })
    }

    /// Items in display order with their display ids. Cheap to call again.
    pub fn list(&self) -> impl Iterator<Item = Listed<'_>> + '_ {
        self.display_order()
            .into_iter()
            .enumerate()
            .map(move |(i, idx)| Listed {
                display_id: i + 1,
                item: &self.items[idx],
            })
    }

    /// Append a new item.
    ///
    /// # Errors
    /// `EmptyText` for blank text, `InvalidDate` for a malformed deadline.
    pub fn add(
        &mut self,
        text: &str,
        group: &str,
        deadline: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&TodoItem> {
        let text = clean_text(text)?;
        let deadline = deadline.map(parse_deadline).transpose()?;
        let group = self.clean_group(group);
        let id = self.allocate_id();

        self.items.push(TodoItem {
            id,
            text,
            group,
            deadline,
            created_at: now,
        });
        tracing::debug!(id, "added to-do");
        Ok(&self.items[self.items.len() - 1])
    }

    /// Apply `edit` to the item shown as `display_id`. Returns the updated item.
    ///
    /// Nothing is changed unless every provided field is valid.
    pub fn edit(&mut self, display_id: usize, edit: TodoEdit) -> Result<&TodoItem> {
        if edit.is_empty() {
            return Err(ValidationError::NothingToEdit.into());
        }
        let idx = self.resolve(display_id)?;
        let text = edit.text.as_deref().map(clean_text).transpose()?;
        let group = edit.group.as_deref().map(|g| self.clean_group(g));

        let item = &mut self.items[idx];
        if let Some(text) = text {
            item.text = text;
        }
        if let Some(group) = group {
            item.group = group;
        }
        match edit.deadline {
            DeadlineEdit::Keep => {}
            DeadlineEdit::Clear => item.deadline = None,
            DeadlineEdit::Set(date) => item.deadline = Some(date),
        }
        tracing::debug!(id = item.id, "edited to-do");
        Ok(&self.items[idx])
    }

    /// Remove the item shown as `display_id`. Its stable id is not reused.
    pub fn remove(&mut self, display_id: usize) -> Result<TodoItem> {
        let idx = self.resolve(display_id)?;
        let removed = self.items.remove(idx);
        tracing::debug!(id = removed.id, "removed to-do");
        Ok(removed)
    }
}
