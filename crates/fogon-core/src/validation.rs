//! # Validation Module
//!
//! Input validation for the back-office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (backoffice-api)                                │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (fogon-db)                                          │
//! │  └── Cross-row rules (duplicate attendance, stock available)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (employee_id, work_date)                                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fogon_core::validation::{validate_month, validate_quantity};
//!
//! validate_month(3).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::types::AttendanceStatus;
use crate::{MAX_STOCK_QUANTITY, MIN_PAYROLL_YEAR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (employee, product, holiday).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use fogon_core::validation::validate_name;
///
/// assert!(validate_name("name", "Ají de gallina").is_ok());
/// assert!(validate_name("name", "  ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Period Validators
// =============================================================================

/// Validates a month number (1-12).
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

/// Validates a payroll year.
///
/// ## Rules
/// - At least `MIN_PAYROLL_YEAR` (2000)
/// - At most 9999
pub fn validate_year(year: i32) -> ValidationResult<()> {
    if !(MIN_PAYROLL_YEAR..=9999).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_PAYROLL_YEAR as i64,
            max: 9999,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_STOCK_QUANTITY`
///
/// ## Stock Receipt
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Receive 24 bottles of chicha morada                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(24) ← THIS FUNCTION                                 │
/// │       │                                                                 │
/// │       ├── qty <= 0?      → "quantity must be positive"                 │
/// │       ├── qty too large? → "quantity must be between ..."              │
/// │       └── OK → movement + lot + kardex entry                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in céntimos; zero is allowed.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage in basis points (0% to 100%).
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Attendance Validators
// =============================================================================

/// Validates the time fields of an attendance record against its status.
///
/// ## Rules
/// - `absent` and `day_off`: no check-in, no check-out
/// - any other status: check-in required
/// - check-out never without check-in
pub fn validate_attendance_times(
    status: AttendanceStatus,
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
) -> ValidationResult<()> {
    if status.is_timeless() {
        if check_in.is_some() || check_out.is_some() {
            return Err(ValidationError::InvalidFormat {
                field: "check_in".to_string(),
                reason: format!("must be empty when status is {}", status),
            });
        }
        return Ok(());
    }

    if check_in.is_none() {
        return Err(ValidationError::Required {
            field: "check_in".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Lomo saltado").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
        assert!(validate_name("name", &"ñ".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year(2000).is_ok());
        assert!(validate_year(2025).is_ok());
        assert!(validate_year(1999).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_STOCK_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_STOCK_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(250).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps("afp", 1200).is_ok());
        assert!(validate_rate_bps("afp", 10_000).is_ok());
        assert!(validate_rate_bps("afp", 10_001).is_err());
    }

    #[test]
    fn test_validate_attendance_times() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0);

        assert!(validate_attendance_times(AttendanceStatus::Present, nine, None).is_ok());
        assert!(validate_attendance_times(AttendanceStatus::Late, None, None).is_err());
        assert!(validate_attendance_times(AttendanceStatus::Absent, None, None).is_ok());
        assert!(validate_attendance_times(AttendanceStatus::DayOff, nine, None).is_err());
        assert!(validate_attendance_times(AttendanceStatus::Justified, nine, nine).is_ok());
    }
}
