//! # Money Module
//!
//! Provides the `Money` type for persisted and reported monetary values.
//!
//! ## Two Kinds of Numbers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DURING A PAYROLL RUN                 AFTER A PAYROLL RUN               │
//! │                                                                         │
//! │  rust_decimal::Decimal                Money (integer céntimos)          │
//! │    3000 / 31 = 96.774193548...          S/ 96.77                        │
//! │    exact, never rounded                 rounded ONCE, half away from 0  │
//! │                                                                         │
//! │  dailyRate × daysElapsed × ...  ──►  Money::from_decimal(gross)        │
//! │                                                                         │
//! │  Rounding every intermediate step compounds error:                      │
//! │    round(3000/31) × 31 = 96.77 × 31 = 2999.87  ❌                       │
//! │    round(3000/31 × 31)              = 3000.00  ✅                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fogon_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let salary = Money::from_cents(300_000); // S/ 3000.00
//! let daily = salary.to_decimal() / Decimal::from(31);
//! let back = Money::from_decimal(daily * Decimal::from(31));
//! assert_eq!(back, salary);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in céntimos (1/100 of a sol).
///
/// ## Design Decisions
/// - **i64 (signed)**: deductions are stored positive, but differences
///   (gross − discounts) can go negative in degenerate periods
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Rounded once**: built from a `Decimal` only at the reporting step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from céntimos.
    ///
    /// ## Example
    /// ```rust
    /// use fogon_core::money::Money;
    ///
    /// let bonus = Money::from_cents(15_000); // S/ 150.00
    /// assert_eq!(bonus.cents(), 15_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole soles.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Rounds an exact decimal amount to céntimos.
    ///
    /// ## Rounding
    /// Half away from zero (`2.345 → 2.35`, `-2.345 → -2.35`), matching the
    /// way payslips have always been rounded by hand.
    ///
    /// ## Example
    /// ```rust
    /// use fogon_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Decimal::new(2345, 3); // 2.345
    /// assert_eq!(Money::from_decimal(amount).cents(), 235);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // 2 decimal places × 100 is always integral; out-of-range values saturate.
        let cents = rounded * Decimal::ONE_HUNDRED;
        let saturated = if cents.is_sign_negative() { i64::MIN } else { i64::MAX };
        Money(cents.to_i64().unwrap_or(saturated))
    }

    /// Returns the exact decimal value in soles.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in céntimos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-soles portion.
    #[inline]
    pub const fn soles(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the céntimos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as `f64` soles, for JSON responses only.
    ///
    /// ## Note
    /// Never feed this back into arithmetic; it exists because the HTTP
    /// contract reports `gross_salary`/`net_salary` as plain numbers.
    pub fn as_soles_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or(0.0)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way it is printed on a Peruvian payslip: `S/ 1234.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}S/ {}.{:02}", sign, self.soles().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a unit count (e.g. unit price × quantity).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
