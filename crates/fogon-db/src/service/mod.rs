//! # Services
//!
//! Operations that span several repositories and must commit or roll back
//! as one unit.
//!
//! ```text
//! let mut tx = db.pool().begin().await?;
//! Repo::a_in(&mut *tx, ..).await?;     ← any `?` drops tx → rollback
//! Repo::b_in(&mut *tx, ..).await?;
//! tx.commit().await?;
//! ```
//!
//! - [`payroll::PayrollService`] - payroll generation and lifecycle
//! - [`inventory::InventoryService`] - order-line workflow, FIFO depletion, stock receipt
//! - [`reminders::ReminderService`] - reservation reminders through a [`reminders::Notifier`]

pub mod inventory;
pub mod payroll;
pub mod reminders;
