//! Reservation reminder rules.

use chrono::{Duration, NaiveDateTime};

use crate::types::Reservation;

/// Country prefix added to local phone numbers.
pub const DEFAULT_COUNTRY_PREFIX: &str = "+51";

impl Reservation {
    /// Scheduled date and hour.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.hour)
    }
}

/// Whether a reminder should go out now.
///
/// Active, not yet notified, and scheduled within `[now, now + lead)`.
pub fn is_due_for_reminder(reservation: &Reservation, now: NaiveDateTime, lead: Duration) -> bool {
    if !reservation.active || reservation.notification_sent {
        return false;
    }

    let at = reservation.scheduled_at();
    at >= now && at < now + lead
}

/// Reminder text sent to the customer.
pub fn reminder_message(reservation: &Reservation) -> String {
    format!(
        "Reservation reminder\n\nDear {}, we remind you that you have a reservation today at {} for {} guest(s). We look forward to seeing you!",
        reservation.customer_name,
        reservation.hour.format("%H:%M"),
        reservation.party_size,
    )
}

/// Normalizes a phone number to international format.
///
/// Numbers already starting with `+` are kept; others get the country
/// prefix. Spaces are stripped. Blank numbers yield `None`.
pub fn international_phone(phone: &str) -> Option<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        None
    } else if compact.starts_with('+') {
        Some(compact)
    } else {
        Some(format!("{}{}", DEFAULT_COUNTRY_PREFIX, compact))
    }
}
