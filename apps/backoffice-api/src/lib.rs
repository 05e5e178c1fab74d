//! # Fogón Back-Office API
//!
//! axum server over `fogon-db`, plus the reservation reminder worker.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        backoffice-api                                   │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐   │
//! │  │   routes/    │   │   error.rs   │   │   worker.rs              │   │
//! │  │ payrolls     │   │ ApiError →   │   │ interval → ReminderSvc   │   │
//! │  │ order_lines  │   │ status+JSON  │   │        → Notifier        │   │
//! │  │ stock        │   └──────────────┘   └──────────────────────────┘   │
//! │  │ health       │                                                     │
//! │  └──────┬───────┘                                                     │
//! │         ▼                                                              │
//! │  AppState { Database, PayrollService, InventoryService }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::BackofficeConfig`]. Environment variables:
//! - `FOGON_CONFIG` - config file path
//! - `FOGON_DATABASE_PATH`, `FOGON_BIND_ADDR`, `FOGON_PORT`
//! - `FOGON_REMINDER_INTERVAL_SECS`, `FOGON_REMINDER_LEAD_MINUTES`
//! - `FOGON_REMINDER_WEBHOOK_URL`
//! - `RUST_LOG` - log filter

pub mod config;
pub mod dto;
pub mod error;
pub mod notifier;
pub mod routes;
pub mod state;
pub mod worker;

pub use config::BackofficeConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
