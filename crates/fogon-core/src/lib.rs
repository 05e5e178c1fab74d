//! # fogon-core: Pure Business Logic for the Fogón Back-Office
//!
//! Payroll arithmetic, FIFO stock depletion and the order-line workflow as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Fogón Back-Office Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-api (axum)                           │   │
//! │  │   /payrolls  /order-lines  /products/{id}/stock  reminders      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            fogon-db (repositories + services)                   │   │
//! │  │    loads inputs, owns transactions, persists results            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fogon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ payroll  │ │   fifo   │ │  order   │ │ calendar │          │   │
//! │  │   │ compute  │ │ deplete  │ │  plan_   │ │ laborable│          │   │
//! │  │   │ period   │ │          │ │transition│ │   days   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Employee, Payroll, InventoryLot, OrderLine, ...)
//! - [`money`] - Integer céntimos, built from exact decimals
//! - [`payroll`] - Period resolution and payroll computation
//! - [`fifo`] - Oldest-lot-first stock depletion
//! - [`order`] - Order-line state machine
//! - [`calendar`] - Month bounds, holidays, laborable days
//! - [`settings`] - Typed payroll settings
//! - [`reservation`] - Reminder window and message
//! - [`time`] - `HH:MM` helpers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use fogon_core::money::Money;
//! use fogon_core::types::Rate;
//!
//! let gross = Money::from_major(2700);
//! let afp = Money::from_decimal(gross.to_decimal() * Rate::from_percent(12).fraction());
//! assert_eq!(afp, Money::from_major(324));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod error;
pub mod fifo;
pub mod money;
pub mod order;
pub mod payroll;
pub mod reservation;
pub mod settings;
pub mod time;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use settings::PayrollSettings;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Earliest year a payroll can be generated for.
pub const MIN_PAYROLL_YEAR: i32 = 2000;

/// Largest quantity accepted in a single stock receipt or depletion.
pub const MAX_STOCK_QUANTITY: i64 = 100_000;
