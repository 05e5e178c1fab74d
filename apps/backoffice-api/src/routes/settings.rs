//! Payroll settings endpoints.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::dto::{MessageResponse, UpdateSettingRequest};
use crate::error::ApiError;
use crate::state::AppState;

type SettingsMap = BTreeMap<String, String>;

/// `GET /payroll-settings`
pub async fn list(State(state): State<AppState>) -> Result<Json<SettingsMap>, ApiError> {
    Ok(Json(state.db.settings().all().await?.into_iter().collect()))
}

/// `PUT /payroll-settings/{key}`
///
/// Takes effect on the next payroll generation.
pub async fn update(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<Json<MessageResponse<SettingsMap>>, ApiError> {
    let Json(req) = payload?;
    let settings = state.db.settings();
    settings.set(&key, &req.value).await?;

    let stored = settings.all().await?.into_iter().collect();
    Ok(Json(MessageResponse::new("Payroll setting updated", stored)))
}
