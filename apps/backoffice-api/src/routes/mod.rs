//! # HTTP Routes
//!
//! ```text
//! POST   /payrolls/generate          generate or recompute a payroll
//! GET    /payrolls                   list (paid, month, year, search, page)
//! GET    /payrolls/{id}              payroll with details
//! POST   /payrolls/{id}/pay          mark paid
//! DELETE /payrolls/{id}              delete unpaid
//! PATCH  /order-lines/{id}           change state (x-user-id)
//! POST   /products/{id}/stock        receive a lot (x-user-id)
//! GET    /products/{id}/stock        stock on hand and lots
//! GET    /products/{id}/kardex       ledger, newest first
//! POST   /attendances                register a work day
//! GET    /attendances                list (employee_id, from, to, status)
//! PATCH  /attendances/{id}           change status and/or check out
//! DELETE /attendances/{id}           delete a record
//! POST   /holidays                   create (one-off or recurring)
//! GET    /holidays                   list for a year (default current)
//! DELETE /holidays/{id}              delete
//! GET    /payroll-settings           stored key/value pairs
//! PUT    /payroll-settings/{key}     set one value
//! GET    /health                     database and migration status
//! ```

pub mod attendance;
pub mod health;
pub mod holidays;
pub mod order_lines;
pub mod payrolls;
pub mod settings;
pub mod stock;

use axum::http::HeaderMap;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the acting user for ledger entries.
pub const USER_HEADER: &str = "x-user-id";

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    let payrolls = Router::new()
        .route("/payrolls", get(payrolls::list))
        .route("/payrolls/generate", post(payrolls::generate))
        .route("/payrolls/{id}", get(payrolls::get).delete(payrolls::delete))
        .route("/payrolls/{id}/pay", post(payrolls::pay));

    let staff = Router::new()
        .route("/attendances", get(attendance::list).post(attendance::register))
        .route(
            "/attendances/{id}",
            patch(attendance::update).delete(attendance::delete),
        )
        .route("/holidays", get(holidays::list).post(holidays::create))
        .route("/holidays/{id}", delete(holidays::delete))
        .route("/payroll-settings", get(settings::list))
        .route("/payroll-settings/{key}", put(settings::update));

    let inventory = Router::new()
        .route("/order-lines/{id}", patch(order_lines::update_state))
        .route("/products/{id}/stock", get(stock::level).post(stock::receive))
        .route("/products/{id}/kardex", get(stock::kardex));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(payrolls)
        .merge(staff)
        .merge(inventory)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reads the acting user from [`USER_HEADER`].
pub(crate) fn acting_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(format!("{} header is required", USER_HEADER)))
}
