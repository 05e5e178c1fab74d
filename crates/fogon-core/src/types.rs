//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  PAYROLL                                                                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Employee      │──►│  EmployeeType   │   │ AttendanceRecord│       │
//! │  │  id, code, name │   │  payment_type   │   │  work_date      │       │
//! │  └─────────────────┘   │  base / hourly  │   │  check_in/out   │       │
//! │                        │  shift, rates   │   │  status         │       │
//! │  ┌─────────────────┐   └─────────────────┘   └─────────────────┘       │
//! │  │    Payroll      │──► PayrollDetail (income | deduction)             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  INVENTORY                                                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryLot   │   │   KardexEntry   │   │   OrderLine     │       │
//! │  │  qty, batch     │   │  inbound (0)    │   │  Dish | Product │       │
//! │  │  expiration     │   │  outbound (1)   │   │  state          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are UUID v4 strings. Amounts are `*_cents`, rates are `*_bps`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::time;

// =============================================================================
// Rate
// =============================================================================

/// A percentage or multiplier represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// - AFP 12%          → 1200 bps
/// - ESSALUD 9%       → 900 bps
/// - Overtime × 1.5   → 15000 bps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (`12` → 12%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    /// Parses a percentage string such as `"12"` or `"12.5"`.
    ///
    /// ## Rules
    /// - Must be a non-negative decimal number
    /// - At most 2 decimal places (one basis point); finer values are
    ///   rejected rather than rounded
    pub fn parse_percent(field: &str, value: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let percent = Decimal::from_str(value.trim()).map_err(|_| invalid("not a number"))?;
        if percent.is_sign_negative() {
            return Err(invalid("must not be negative"));
        }
        if percent.normalize().scale() > 2 {
            return Err(invalid("at most 2 decimal places"));
        }

        (percent * Decimal::ONE_HUNDRED)
            .to_u32()
            .map(Rate)
            .ok_or_else(|| invalid("out of range"))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (`1200 bps` → `0.12`).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Employees
// =============================================================================

/// Payment scheme of an employee type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Monthly salary prorated over laborable days.
    Fixed,
    /// Paid per worked hour.
    Hourly,
}

/// A person on the payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Staff code printed on the badge.
    pub code: String,
    pub employee_type_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Compensation rules shared by a group of employees (waiter, cook, ...).
///
/// Exactly one of `base_salary_cents` / `hourly_rate_cents` is meaningful,
/// selected by `payment_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EmployeeType {
    pub id: String,
    pub name: String,
    pub payment_type: PaymentType,
    pub base_salary_cents: Option<i64>,
    pub hourly_rate_cents: Option<i64>,
    /// Standard daily shift length in minutes (480 = 8 h).
    pub shift_minutes: i64,
    /// Overtime multiplier in bps (15000 = 1.5×).
    pub overtime_rate_bps: i64,
    pub has_punctuality_bonus: bool,
    pub punctuality_bonus_cents: Option<i64>,
    pub active: bool,
}

impl EmployeeType {
    /// Default shift: 8 hours.
    pub const DEFAULT_SHIFT_MINUTES: i64 = 480;

    /// Default overtime multiplier: 1.5×.
    pub const DEFAULT_OVERTIME_RATE_BPS: i64 = 15_000;

    /// Monthly base salary (zero when not set).
    #[inline]
    pub fn base_salary(&self) -> Money {
        Money::from_cents(self.base_salary_cents.unwrap_or(0))
    }

    /// Hourly rate (zero when not set).
    #[inline]
    pub fn hourly_rate(&self) -> Money {
        Money::from_cents(self.hourly_rate_cents.unwrap_or(0))
    }

    /// Punctuality bonus amount (zero when not set).
    #[inline]
    pub fn punctuality_bonus(&self) -> Money {
        Money::from_cents(self.punctuality_bonus_cents.unwrap_or(0))
    }

    /// Overtime multiplier.
    #[inline]
    pub fn overtime_rate(&self) -> Rate {
        Rate::from_bps(u32::try_from(self.overtime_rate_bps).unwrap_or(0))
    }

    /// Shift length in exact hours (`450` minutes → `7.5`).
    #[inline]
    pub fn shift_hours(&self) -> Decimal {
        Decimal::from(self.shift_minutes) / Decimal::from(60)
    }
}

// =============================================================================
// Attendance
// =============================================================================

/// Daily attendance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Justified,
    DayOff,
}

impl AttendanceStatus {
    /// Present and late both count as attended days.
    #[inline]
    pub const fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }

    /// Statuses that carry no check-in/check-out times.
    #[inline]
    pub const fn is_timeless(&self) -> bool {
        matches!(self, AttendanceStatus::Absent | AttendanceStatus::DayOff)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Justified => "justified",
            AttendanceStatus::DayOff => "day_off",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; accepts `day off`, `day-off` and `day_off`.
impl FromStr for AttendanceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            "justified" => Ok(AttendanceStatus::Justified),
            "day_off" => Ok(AttendanceStatus::DayOff),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ["present", "late", "absent", "justified", "day_off"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// One employee's attendance for one work date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub justification: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Worked minutes derived from check-in/check-out.
    ///
    /// `None` until both times are known. A check-out earlier than the
    /// check-in is a shift that crossed midnight.
    pub fn worked_minutes(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(time::worked_minutes(check_in, check_out)),
            _ => None,
        }
    }

    /// Worked time as `HH:MM`.
    pub fn worked_hours(&self) -> Option<String> {
        self.worked_minutes().map(time::format_minutes)
    }
}

// =============================================================================
// Holidays
// =============================================================================

/// A public holiday or restaurant-wide closing day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Holiday {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    /// Repeats every year on the same month and day.
    pub is_recurring: bool,
}

// =============================================================================
// Payroll
// =============================================================================

/// Direction of a payroll line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Income,
    Deduction,
}

/// A generated payroll for one employee and one period.
///
/// Immutable once `paid` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payroll {
    pub id: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Salary (fixed) or hourly rate (hourly) at generation time.
    pub base_salary_cents: i64,
    pub laborable_days: i64,
    pub days_present: i64,
    pub days_absent: i64,
    pub days_justified: i64,
    pub worked_minutes: i64,
    pub overtime_minutes: i64,
    pub overtime_payment_cents: i64,
    pub bonuses_cents: i64,
    pub absence_discount_cents: i64,
    pub proportional_base_cents: i64,
    pub gross_total_cents: i64,
    pub afp_discount_cents: i64,
    /// Employer contribution; informational, never subtracted from net.
    pub essalud_contribution_cents: i64,
    pub net_total_cents: i64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payroll {
    #[inline]
    pub fn gross_total(&self) -> Money {
        Money::from_cents(self.gross_total_cents)
    }

    #[inline]
    pub fn net_total(&self) -> Money {
        Money::from_cents(self.net_total_cents)
    }

    /// Worked time as `HH:MM`.
    pub fn worked_hours(&self) -> String {
        time::format_minutes(self.worked_minutes)
    }

    /// Overtime as `HH:MM`.
    pub fn overtime_hours(&self) -> String {
        time::format_minutes(self.overtime_minutes)
    }
}

/// One line of a payroll (overtime, AFP, bonus, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PayrollDetail {
    pub id: String,
    pub payroll_id: String,
    pub concept: String,
    pub amount_cents: i64,
    pub kind: DetailKind,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Direction of a kardex movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Inbound = 0,
    Outbound = 1,
}

/// A stock-tracked product sold as-is (drinks, packaged goods).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Only tracked products are depleted from lots.
    pub track_inventory: bool,
    pub active: bool,
}

/// A dish prepared in the kitchen; `quantity` is portions available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub quantity: i64,
}

/// A quantity of a product received together.
///
/// FIFO order is `created_at` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryLot {
    pub id: String,
    pub product_id: String,
    /// Stock receipt this lot came from.
    pub movement_id: Option<String>,
    /// Units remaining; never negative.
    pub quantity: i64,
    pub batch: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub unit_price_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Append-only inventory ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct KardexEntry {
    pub id: String,
    pub user_id: String,
    pub product_id: Option<String>,
    pub input_id: Option<String>,
    pub movement_id: Option<String>,
    /// Paired `movement_details` row (lot or outbound unit).
    pub detail_id: Option<String>,
    pub movement_type: MovementType,
    pub total_price_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// What an order line refers to: a dish or a product, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OrderItem {
    Dish(String),
    Product(String),
}

impl OrderItem {
    /// Builds the variant from the two nullable storage columns.
    ///
    /// ## Errors
    /// Both or neither set → `InvalidFormat`.
    pub fn from_columns(dish_id: Option<String>, product_id: Option<String>) -> CoreResult<Self> {
        match (dish_id, product_id) {
            (Some(dish), None) => Ok(OrderItem::Dish(dish)),
            (None, Some(product)) => Ok(OrderItem::Product(product)),
            (dish, product) => Err(ValidationError::InvalidFormat {
                field: "order_line".to_string(),
                reason: format!(
                    "exactly one of dish/product must be set (dish: {}, product: {})",
                    dish.is_some(),
                    product.is_some()
                ),
            }
            .into()),
        }
    }

    /// Splits back into `(dish_id, product_id)` columns.
    pub fn to_columns(&self) -> (Option<&str>, Option<&str>) {
        match self {
            OrderItem::Dish(id) => (Some(id.as_str()), None),
            OrderItem::Product(id) => (None, Some(id.as_str())),
        }
    }
}

/// Kitchen/floor workflow state of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderLineState {
    Pending,
    InPreparation,
    InDelivery,
    Completed,
    Cancelled,
}

impl OrderLineState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderLineState::Pending => "pending",
            OrderLineState::InPreparation => "in_preparation",
            OrderLineState::InDelivery => "in_delivery",
            OrderLineState::Completed => "completed",
            OrderLineState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderLineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderLineState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "pending" => Ok(OrderLineState::Pending),
            "in_preparation" => Ok(OrderLineState::InPreparation),
            "in_delivery" => Ok(OrderLineState::InDelivery),
            "completed" => Ok(OrderLineState::Completed),
            "cancelled" => Ok(OrderLineState::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "state".to_string(),
                allowed: ["pending", "in_preparation", "in_delivery", "completed", "cancelled"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// A line of a customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub item: OrderItem,
    pub quantity: i64,
    pub state: OrderLineState,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Reservations
// =============================================================================

/// A table reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: String,
    /// Code given to the customer.
    pub code: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub date: NaiveDate,
    pub hour: NaiveTime,
    pub party_size: i64,
    pub active: bool,
    /// Set once the reminder went out; never reset.
    pub notification_sent: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
