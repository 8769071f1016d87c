use chrono::Local;
use clap::{Subcommand, ValueEnum};
use workman_core::CoreError;

use super::{print_json, Context};
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Week {
    Current,
    Last,
}

impl Week {
    fn offset(self) -> i64 {
        match self {
            Week::Current => 0,
            Week::Last => -1,
        }
    }
}

#[derive(Subcommand)]
pub enum LogAction {
    /// Display the work log for a given week
    Show {
        /// Which week to display
        #[arg(value_enum, default_value = "current")]
        week: Week,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove old log entries
    Prune {
        /// Prune entries older than this many months (default: log.retention_months)
        #[arg(short, long)]
        months: Option<u32>,
    },
}

pub fn run(action: LogAction) -> Result<(), CoreError> {
    let ctx = Context::open()?;
    let today = Local::now().date_naive();

    match action {
        LogAction::Show { week, json } => {
            let report = ctx.stores.log.load()?.weekly_total(today, week.offset());
            if json {
                return print_json(&report);
            }
            print!("{}", render::week(&report));
        }
        LogAction::Prune { months } => {
            let months = months.unwrap_or(ctx.config.log.retention_months);
            let mut log = ctx.stores.log.load()?;
            let summary = log.prune(today, months);
            if summary.removed > 0 {
                ctx.stores.log.save(&log)?;
                println!(
                    "Pruned {} log entries older than {} months (before {}).",
                    summary.removed, months, summary.cutoff
                );
            } else {
                println!("No old log entries found to prune.");
            }
        }
    }
    Ok(())
}
