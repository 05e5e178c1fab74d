//! Background reservation reminder loop.

use std::time::Duration;

use chrono::Local;
use fogon_db::ReminderService;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runs a reminder pass every `every`, starting immediately.
///
/// Failures are logged and the loop keeps going; reservations left
/// unsent are picked up on the next tick.
pub fn spawn_reminder_worker(service: ReminderService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(every_secs = every.as_secs(), "Reminder worker started");
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match service.run_once(Local::now().naive_local()).await {
                Ok(report) if report.sent + report.failed + report.skipped > 0 => {
                    info!(sent = report.sent, skipped = report.skipped, failed = report.failed, "Reminder pass");
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "Reminder pass failed"),
            }
        }
    })
}
