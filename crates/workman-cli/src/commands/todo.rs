//! To-do commands for CLI.

use chrono::{Local, Utc};
use clap::Subcommand;
use workman_core::notifier::scan;
use workman_core::{CoreError, DeadlineEdit, TodoEdit};

use super::{print_json, Context};
use crate::render;

#[derive(Subcommand)]
pub enum TodoAction {
    /// List all to-do items
    List {
        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new to-do item
    Add {
        /// The description of the task
        task: String,
        /// Group for the task (blank or omitted: todo.default_group)
        #[arg(short, long)]
        group: Option<String>,
        /// Deadline in YYYY-MM-DD format
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Remove a to-do item by its id from 'todo list'
    Rm {
        /// Id shown by 'todo list'
        id: usize,
    },
    /// Change the text, group or deadline of a to-do item
    Edit {
        /// Id shown by 'todo list'
        id: usize,
        /// New description
        #[arg(short, long)]
        task: Option<String>,
        /// New group
        #[arg(short, long)]
        group: Option<String>,
        /// New deadline in YYYY-MM-DD format, or 'none' to clear it
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Check for overdue and upcoming deadlines
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TodoAction) -> Result<(), CoreError> {
    let ctx = Context::open()?;
    let mut todos = ctx
        .stores
        .todos
        .load()?
        .with_default_group(&ctx.config.todo.default_group);

    match action {
        TodoAction::List { json } => {
            if json {
                return print_json(&render::todo_rows(&todos));
            }
            print!("{}", render::todo_list(&todos));
        }
        TodoAction::Add {
            task,
            group,
            deadline,
        } => {
            let item = todos
                .add(&task, group.as_deref().unwrap_or(""), deadline.as_deref(), Utc::now())?
                .clone();
            ctx.stores.todos.save(&todos)?;
            println!("Added to-do: '{}' to group '{}'.", item.text, item.group);
            print!("{}", render::todo_list(&todos));
        }
        TodoAction::Rm { id } => {
            let removed = todos.remove(id)?;
            ctx.stores.todos.save(&todos)?;
            println!("Removed to-do: '{}'", removed.text);
            print!("{}", render::todo_list(&todos));
        }
        TodoAction::Edit {
            id,
            task,
            group,
            deadline,
        } => {
            let edit = TodoEdit {
                text: task,
                group,
                deadline: DeadlineEdit::parse(deadline.as_deref())?,
            };
            let text = todos.edit(id, edit)?.text.clone();
            ctx.stores.todos.save(&todos)?;
            println!("Updated to-do: '{text}'");
            print!("{}", render::todo_list(&todos));
        }
        TodoAction::Check { json } => {
            let report = scan(
                &todos,
                Local::now().date_naive(),
                ctx.config.todo.due_soon_days,
            );
            if json {
                return print_json(&report);
            }
            if report.is_empty() {
                println!("No overdue or upcoming deadlines.");
            } else {
                print!("{}", render::deadlines(&report));
            }
        }
    }
    Ok(())
}
