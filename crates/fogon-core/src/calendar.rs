//! # Calendar Rules
//!
//! Month bounds, holiday matching and the laborable-day set used to prorate
//! fixed salaries.
//!
//! ## Laborable Days
//! ```text
//! start ─────────────────────────────────────────────► end of start's month
//!   │  Mon Tue Wed Thu Fri Sat Sun Mon ...
//!   │   ✓   ✓   ✗   ✓   ✓   ✓   ✗   ✓
//!   │           │               │
//!   │        holiday        weekly day-off
//!   │
//!   └── total = count(✓)      elapsed = count(✓ where day ≤ window end)
//! ```

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{CoreResult, ValidationError};
use crate::types::Holiday;

/// First day of the month.
pub fn first_day_of_month(year: i32, month: u32) -> CoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: format!("{}-{:02} is not a valid month", year, month),
        }
        .into()
    })
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

impl Holiday {
    /// Recurring holidays match any year on the same month and day.
    pub fn matches(&self, date: NaiveDate) -> bool {
        if self.is_recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}

/// Whether any holiday falls on `date`.
pub fn is_holiday(holidays: &[Holiday], date: NaiveDate) -> bool {
    holidays.iter().any(|h| h.matches(date))
}

/// Laborable days from `start` through the end of `start`'s month.
///
/// Excludes holidays and the configured weekly days off.
pub fn laborable_days(
    start: NaiveDate,
    holidays: &[Holiday],
    day_offs: &HashSet<Weekday>,
) -> Vec<NaiveDate> {
    let last = end_of_month(start);
    start
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| !day_offs.contains(&d.weekday()))
        .filter(|d| !is_holiday(holidays, *d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(d: NaiveDate, recurring: bool) -> Holiday {
        Holiday {
            id: "h".to_string(),
            name: "Feriado".to_string(),
            date: d,
            is_recurring: recurring,
        }
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(date(2025, 2, 10)), date(2025, 2, 28));
        assert_eq!(end_of_month(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2025, 12, 31)), date(2025, 12, 31));
    }

    #[test]
    fn test_first_day_of_month_rejects_bad_month() {
        assert_eq!(first_day_of_month(2025, 3).unwrap(), date(2025, 3, 1));
        assert!(first_day_of_month(2025, 13).is_err());
    }

    #[test]
    fn test_recurring_holiday_matches_every_year() {
        let christmas = holiday(date(2020, 12, 25), true);
        assert!(christmas.matches(date(2025, 12, 25)));
        assert!(christmas.matches(date(2031, 12, 25)));
        assert!(!christmas.matches(date(2025, 12, 24)));
    }

    #[test]
    fn test_one_off_holiday_matches_only_its_date() {
        let labour_day = holiday(date(2025, 5, 1), false);
        assert!(labour_day.matches(date(2025, 5, 1)));
        assert!(!labour_day.matches(date(2026, 5, 1)));
    }

    #[test]
    fn test_laborable_days_excludes_sundays_and_holidays() {
        // December 2025: 31 days, 4 Sundays (7, 14, 21, 28), Christmas on a Thursday.
        let day_offs = HashSet::from([Weekday::Sun]);
        let holidays = vec![holiday(date(2019, 12, 25), true)];

        let days = laborable_days(date(2025, 12, 1), &holidays, &day_offs);
        assert_eq!(days.len(), 26);
        assert!(!days.contains(&date(2025, 12, 25)));
        assert!(!days.contains(&date(2025, 12, 7)));
    }

    #[test]
    fn test_laborable_days_from_mid_month() {
        let days = laborable_days(date(2025, 3, 16), &[], &HashSet::new());
        assert_eq!(days.first(), Some(&date(2025, 3, 16)));
        assert_eq!(days.last(), Some(&date(2025, 3, 31)));
        assert_eq!(days.len(), 16);
    }
}
