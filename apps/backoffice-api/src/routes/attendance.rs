//! Attendance endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fogon_core::time::parse_time;
use fogon_core::{AttendanceRecord, AttendanceStatus};
use fogon_db::repository::attendance::{AttendanceFilter, NewAttendance};

use crate::dto::{MessageResponse, RegisterAttendanceRequest, UpdateAttendanceRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /attendances`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAttendanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<AttendanceRecord>>), ApiError> {
    let Json(req) = payload?;
    let status: AttendanceStatus = req.status.parse()?;
    let check_in = req.check_in.as_deref().map(|t| parse_time("check_in", t)).transpose()?;
    let check_out = req.check_out.as_deref().map(|t| parse_time("check_out", t)).transpose()?;

    let record = state
        .db
        .attendance()
        .register(NewAttendance {
            employee_id: req.employee_id.trim().to_string(),
            work_date: req.work_date,
            check_in,
            check_out,
            status,
            justification: req.justification,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Attendance registered", record))))
}

/// `GET /attendances`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<AttendanceFilter>, QueryRejection>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(state.db.attendance().list(&filter).await?))
}

/// `PATCH /attendances/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAttendanceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse<AttendanceRecord>>, ApiError> {
    let Json(req) = payload?;
    let status = req.status.as_deref().map(str::parse::<AttendanceStatus>).transpose()?;
    let check_out = req.check_out.as_deref().map(|t| parse_time("check_out", t)).transpose()?;
    if status.is_none() && check_out.is_none() {
        return Err(ApiError::validation("status or check_out is required"));
    }

    let repo = state.db.attendance();
    let mut record = None;
    if let Some(status) = status {
        record = Some(repo.update_status(&id, status, req.justification).await?);
    }
    if let Some(check_out) = check_out {
        record = Some(repo.record_check_out(&id, check_out).await?);
    }

    let record = record.ok_or_else(|| ApiError::internal("Attendance update produced no record"))?;
    Ok(Json(MessageResponse::new("Attendance updated", record)))
}

/// `DELETE /attendances/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.db.attendance().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_register_check_out_and_list() {
        let (app, db) = app().await;
        let employee = db.employees().create("Rosa Mamani", "EMP-010", None).await.unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/attendances",
            Some(json!({
                "employee_id": employee.id,
                "work_date": "2025-04-01",
                "status": "present",
                "check_in": "09:00"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/attendances/{}", id),
            Some(json!({"check_out": "17:30"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["check_out"], "17:30:00");

        let uri = format!("/attendances?employee_id={}&from=2025-04-01&to=2025-04-30", employee.id);
        let (status, records) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(records.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_day_and_unknown_employee() {
        let (app, db) = app().await;
        let employee = db.employees().create("Rosa Mamani", "EMP-010", None).await.unwrap();
        let body = json!({
            "employee_id": employee.id,
            "work_date": "2025-04-02",
            "status": "absent"
        });

        let (status, _) = send(&app, "POST", "/attendances", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&app, "POST", "/attendances", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            "POST",
            "/attendances",
            Some(json!({"employee_id": "nobody", "work_date": "2025-04-02", "status": "absent"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_status_and_delete() {
        let (app, db) = app().await;
        let employee = db.employees().create("Rosa Mamani", "EMP-010", None).await.unwrap();
        let (_, body) = send(
            &app,
            "POST",
            "/attendances",
            Some(json!({
                "employee_id": employee.id,
                "work_date": "2025-04-03",
                "status": "late",
                "check_in": "09:40"
            })),
        )
        .await;
        let uri = format!("/attendances/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({"status": "justified", "justification": "Cita médica"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "justified");

        let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, _) = send(&app, "PATCH", &uri, Some(json!({"check_out": "25:99"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
