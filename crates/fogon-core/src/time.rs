//! Time-of-day helpers: `HH:MM` parsing, shift durations, minute formatting.

use chrono::NaiveTime;

use crate::error::ValidationError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected HH:MM, got '{}'", value),
        })
}

/// Minutes between check-in and check-out.
///
/// A check-out earlier than the check-in means the shift crossed midnight.
pub fn worked_minutes(check_in: NaiveTime, check_out: NaiveTime) -> i64 {
    let minutes = (check_out - check_in).num_minutes();
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// `605` → `"10:05"`.
pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}
