//! Typed payroll settings, parsed once per payroll run from the
//! `payroll_settings` key/value table.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::Rate;

pub const KEY_AFP: &str = "afp_percentage";
pub const KEY_ESSALUD: &str = "essalud_percentage";
pub const KEY_DAY_OFFS: &str = "general_day_offs";

/// Every key the payroll engine reads.
pub const KEYS: [&str; 3] = [KEY_AFP, KEY_ESSALUD, KEY_DAY_OFFS];

/// Payroll settings.
///
/// ## Defaults
/// | key                  | default   |
/// |----------------------|-----------|
/// | `afp_percentage`     | `12`      |
/// | `essalud_percentage` | `9`       |
/// | `general_day_offs`   | `sunday`  |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Pension deduction withheld from the employee.
    pub afp: Rate,
    /// Employer health contribution (informational).
    pub essalud: Rate,
    /// Weekly days off, never laborable.
    pub day_offs: HashSet<Weekday>,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            afp: Rate::from_percent(12),
            essalud: Rate::from_percent(9),
            day_offs: HashSet::from([Weekday::Sun]),
        }
    }
}

impl PayrollSettings {
    /// Builds settings from stored `(key, value)` pairs.
    ///
    /// Missing keys fall back to defaults; unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Self::default();

        for (key, value) in pairs {
            match key {
                KEY_AFP => settings.afp = Rate::parse_percent(KEY_AFP, value)?,
                KEY_ESSALUD => settings.essalud = Rate::parse_percent(KEY_ESSALUD, value)?,
                KEY_DAY_OFFS => settings.day_offs = parse_day_offs(value)?,
                _ => {}
            }
        }

        Ok(settings)
    }
}

/// Parses a comma list of weekday names (`"saturday, Sunday"`).
///
/// Case-insensitive; blank entries are skipped.
pub fn parse_day_offs(value: &str) -> Result<HashSet<Weekday>, ValidationError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            name.parse::<Weekday>().map_err(|_| ValidationError::InvalidFormat {
                field: KEY_DAY_OFFS.to_string(),
                reason: format!("unknown weekday '{}'", name),
            })
        })
        .collect()
}
