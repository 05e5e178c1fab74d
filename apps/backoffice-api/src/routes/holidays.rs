//! Holiday endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Local};
use fogon_core::Holiday;

use crate::dto::{CreateHolidayRequest, HolidayQuery, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /holidays`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateHolidayRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<Holiday>>), ApiError> {
    let Json(req) = payload?;
    let holiday = state
        .db
        .holidays()
        .create(&req.name, req.date, req.is_recurring)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Holiday created", holiday))))
}

/// `GET /holidays?year=`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<HolidayQuery>, QueryRejection>,
) -> Result<Json<Vec<Holiday>>, ApiError> {
    let Query(query) = query?;
    let year = query.year.unwrap_or_else(|| Local::now().year());
    Ok(Json(state.db.holidays().list_by_year(year).await?))
}

/// `DELETE /holidays/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.db.holidays().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
