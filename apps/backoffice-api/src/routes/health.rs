//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fogon_db::migrations::migration_status;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (total, applied) = match migration_status(state.db.pool()).await {
        Ok(counts) => counts,
        Err(e) => {
            warn!(error = %e, "Could not read migration status");
            (0, 0)
        }
    };

    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            migrations_applied: applied as u32,
            migrations_total: total as u32,
        }),
    )
}
