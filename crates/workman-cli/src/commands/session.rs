use chrono::Local;
use workman_core::session::{hook, TIMESTAMP_FORMAT};
use workman_core::{CoreError, SessionStatus, SessionTracker, TrackerSettings};

use super::{print_json, Context};
use crate::render;

pub fn start() -> Result<(), CoreError> {
    let ctx = Context::open()?;
    let hook = hook::from_config(&ctx.config.auto_stop);
    let tracker = SessionTracker::new(&ctx.stores, hook.as_ref(), TrackerSettings::from(&ctx.config));

    let report = tracker.start(Local::now())?;
    print!("{}", render::deadlines(&report.deadlines));
    println!(
        "Work session started at {}",
        report.started_at.format(TIMESTAMP_FORMAT)
    );
    match report.hook_warning {
        Some(warning) => {
            eprintln!("warning: could not enable '{}': {warning}", ctx.config.auto_stop.unit);
            eprintln!("The automatic stop-on-shutdown feature may not work.");
        }
        None if ctx.config.auto_stop.enabled => {
            println!("The system will now automatically log your hours on shutdown/reboot.");
        }
        None => {}
    }
    Ok(())
}

pub fn stop() -> Result<(), CoreError> {
    let ctx = Context::open()?;
    let hook = hook::from_config(&ctx.config.auto_stop);
    let tracker = SessionTracker::new(&ctx.stores, hook.as_ref(), TrackerSettings::from(&ctx.config));

    let report = tracker.stop(Local::now())?;
    println!(
        "Work session stopped at {}",
        report.stopped_at.format(TIMESTAMP_FORMAT)
    );
    println!("Session duration: {}.", render::duration_long(report.duration_seconds));
    if let Some(pruned) = report.pruned.filter(|p| p.removed > 0) {
        println!(
            "Pruned {} log entries older than {} months.",
            pruned.removed, pruned.months
        );
    }
    if let Some(warning) = report.hook_warning {
        eprintln!("warning: could not disable '{}': {warning}", ctx.config.auto_stop.unit);
    }
    Ok(())
}

pub fn status(json: bool) -> Result<(), CoreError> {
    let ctx = Context::open()?;
    let tracker = SessionTracker::new(
        &ctx.stores,
        &workman_core::NoopHook,
        TrackerSettings::from(&ctx.config),
    );

    let status = tracker.status(Local::now())?;
    if json {
        return print_json(&status);
    }
    match status {
        SessionStatus::Idle => println!("You are not currently working."),
        SessionStatus::Running {
            started_at,
            elapsed_seconds,
        } => {
            println!(
                "Currently working. Session started at: {}",
                started_at.format(TIMESTAMP_FORMAT)
            );
            println!("Elapsed time: {}.", render::duration_long(elapsed_seconds));
        }
    }
    Ok(())
}
