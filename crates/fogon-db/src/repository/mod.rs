//! # Repository Module
//!
//! Database repository implementations for the back-office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways In                                          │
//! │                                                                         │
//! │  Standalone read/write          Inside a service transaction            │
//! │  db.holidays().list_by_year()   PayrollRepository::latest_in(&mut tx)  │
//! │       │                              │                                  │
//! │       │  &self.pool                  │  &mut SqliteConnection           │
//! │       ▼                              ▼                                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        SQLite Database                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  `*_in` functions never begin or commit; the caller owns the tx.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Employees and employee types
//! - [`AttendanceRepository`](attendance::AttendanceRepository) - Daily attendance
//! - [`HolidayRepository`](holiday::HolidayRepository) - Holidays
//! - [`SettingsRepository`](settings::SettingsRepository) - Payroll settings
//! - [`PayrollRepository`](payroll::PayrollRepository) - Payrolls and details
//! - [`InventoryRepository`](inventory::InventoryRepository) - Products, lots, kardex
//! - [`OrderRepository`](order::OrderRepository) - Orders, order lines, dishes
//! - [`ReservationRepository`](reservation::ReservationRepository) - Reservations

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod inventory;
pub mod order;
pub mod payroll;
pub mod reservation;
pub mod settings;

/// Generates a new primary key.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
