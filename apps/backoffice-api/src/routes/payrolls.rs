//! Payroll endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fogon_core::Payroll;
use fogon_db::repository::payroll::PayrollPage;
use fogon_db::service::payroll::PayrollWithDetails;
use fogon_db::PayrollFilter;

use crate::dto::{GeneratePayrollRequest, GeneratePayrollResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /payrolls/generate`
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayrollRequest>, JsonRejection>,
) -> Result<Json<GeneratePayrollResponse>, ApiError> {
    let Json(req) = payload?;
    let generated = state
        .payrolls
        .generate(req.employee_id.trim(), req.month, req.year)
        .await?;
    Ok(Json(generated.into()))
}

/// `GET /payrolls`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PayrollFilter>, QueryRejection>,
) -> Result<Json<PayrollPage>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(state.payrolls.list(&filter).await?))
}

/// `GET /payrolls/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PayrollWithDetails>, ApiError> {
    Ok(Json(state.payrolls.get(&id).await?))
}

/// `POST /payrolls/{id}/pay`
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<Payroll>>, ApiError> {
    let payroll = state.payrolls.mark_paid(&id).await?;
    Ok(Json(MessageResponse::new("Payroll marked as paid", payroll)))
}

/// `DELETE /payrolls/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.payrolls.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
