//! # Error Types
//!
//! Domain-specific error types for fogon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fogon-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fogon-db errors (separate crate)                                      │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  HTTP errors (backoffice-api)                                          │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::OrderLineState;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Employee cannot be found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// Employee exists but has no employee type assigned.
    #[error("Employee {0} has no employee type assigned")]
    EmployeeTypeNotFound(String),

    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order line cannot be found.
    #[error("Order line not found: {0}")]
    OrderLineNotFound(String),

    /// Payroll cannot be found.
    #[error("Payroll not found: {0}")]
    PayrollNotFound(String),

    /// Payroll cannot be generated without attended days.
    ///
    /// ## When This Occurs
    /// ```text
    /// Generate payroll (employee, 2025-03)
    ///      │
    ///      ▼
    /// Attendance in window: 0 present, 0 late
    ///      │
    ///      ▼
    /// NoAttendance ← terminal, nothing is written
    /// ```
    #[error("Employee {employee_id} has no attended days between {start} and {end}")]
    NoAttendance {
        employee_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Not enough units across all lots to fulfil a depletion.
    ///
    /// The whole depletion is rejected; no lot is touched.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Order line state change is not part of the allowed workflow.
    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: OrderLineState,
        to: OrderLineState,
    },

    /// Payroll was already paid and is now immutable.
    #[error("Payroll {0} is already paid")]
    PayrollAlreadyPaid(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid weekday, invalid time).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., second attendance for the same day).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
