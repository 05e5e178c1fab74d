//! # Reservation Reminders
//!
//! One pass of the reminder job. The API app runs it on an interval.
//!
//! ```text
//! pending reservations for today (and tomorrow near midnight)
//!     │  due within [now, now + lead)?
//!     ▼
//! phone? ── no ──► skipped (warn)
//!     │
//!     ▼
//! Notifier::send ── err ──► failed (warn, retried next pass)
//!     │
//!     ▼
//! mark_notified
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use fogon_core::reservation::{international_phone, is_due_for_reminder, reminder_message};

/// Minutes ahead of a reservation a reminder goes out.
pub const DEFAULT_LEAD_MINUTES: i64 = 10;

/// Delivery failure reported by a [`Notifier`].
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound message channel (WhatsApp gateway, SMS, log, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` to `phone` (international format).
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifyError>;
}

/// Counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Sends reservation reminders.
#[derive(Clone)]
pub struct ReminderService {
    db: Database,
    notifier: Arc<dyn Notifier>,
    lead: Duration,
}

impl ReminderService {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>, lead: Duration) -> Self {
        ReminderService { db, notifier, lead }
    }

    /// Runs one pass at local time `now`.
    pub async fn run_once(&self, now: NaiveDateTime) -> DbResult<ReminderReport> {
        let mut dates = vec![now.date()];
        let horizon = (now + self.lead).date();
        if horizon != now.date() {
            dates.push(horizon);
        }

        let mut report = ReminderReport::default();
        for date in dates {
            for reservation in self.db.reservations().pending_for_date(date).await? {
                if !is_due_for_reminder(&reservation, now, self.lead) {
                    continue;
                }

                let Some(phone) = reservation.customer_phone.as_deref().and_then(international_phone) else {
                    warn!(reservation_id = %reservation.id, code = %reservation.code, "Reservation has no phone; skipping reminder");
                    report.skipped += 1;
                    continue;
                };

                match self.notifier.send(&phone, &reminder_message(&reservation)).await {
                    Ok(()) => {
                        if self.db.reservations().mark_notified(&reservation.id).await? {
                            info!(reservation_id = %reservation.id, phone = %phone, "Reminder sent");
                            report.sent += 1;
                        }
                    }
                    Err(e) => {
                        warn!(reservation_id = %reservation.id, error = %e, "Reminder failed");
                        report.failed += 1;
                    }
                }
            }
        }

        debug!(sent = report.sent, skipped = report.skipped, failed = report.failed, "Reminder pass done");
        Ok(report)
    }
}

impl std::fmt::Debug for ReminderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderService")
            .field("lead", &self.lead)
            .finish_non_exhaustive()
    }
}
