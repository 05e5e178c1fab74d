//! # fogon-db: Database Layer for the Fogón Back-Office
//!
//! SQLite storage for payroll, attendance, inventory, orders and
//! reservations, plus the services that need a transaction around several
//! repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fogón Data Flow                                  │
//! │                                                                         │
//! │  HTTP handler (backoffice-api)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fogon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │───►│               │    │  (embedded)  │  │   │
//! │  │   │ PayrollSvc    │    │ EmployeeRepo  │    │ 001_payroll  │  │   │
//! │  │   │ InventorySvc  │    │ PayrollRepo   │    │ 002_inventory│  │   │
//! │  │   │ ReminderSvc   │    │ InventoryRepo │    │ 003_reserv.  │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │  fogon-core engines │                              │   │
//! │  │           ▼                     ▼                              │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐ │   │
//! │  │   │              Database (pool.rs, SqlitePool)              │ │   │
//! │  │   └─────────────────────────────────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`service`] - Transactional operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fogon_db::{Database, DbConfig, EmployeeLocks, PayrollService};
//!
//! let db = Database::new(DbConfig::new("fogon.db")).await?;
//! let payrolls = PayrollService::new(db.clone(), EmployeeLocks::new());
//! let result = payrolls.generate(&employee_id, 3, Some(2025)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::attendance::AttendanceRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::holiday::HolidayRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::order::OrderRepository;
pub use repository::payroll::{PayrollFilter, PayrollRepository};
pub use repository::reservation::ReservationRepository;
pub use repository::settings::SettingsRepository;

pub use service::inventory::InventoryService;
pub use service::payroll::{EmployeeLocks, PayrollService};
pub use service::reminders::{Notifier, NotifyError, ReminderService};
