//! # API Error Handling
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as a
//! status code plus a JSON body.
//!
//! ```text
//! ValidationError → CoreError → DbError → ApiError → HTTP
//!
//! { "success": false, "code": "INSUFFICIENT_STOCK", "message": "..." }
//! ```
//!
//! | Code                   | Status |
//! |------------------------|--------|
//! | `NOT_FOUND`            | 404    |
//! | `VALIDATION_ERROR`     | 422    |
//! | `NO_ATTENDANCE`        | 422    |
//! | `INVALID_TRANSITION`   | 400    |
//! | `PAYROLL_ALREADY_PAID` | 400    |
//! | `INSUFFICIENT_STOCK`   | 409    |
//! | `DATABASE_ERROR`       | 500    |
//! | `INTERNAL_ERROR`       | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fogon_core::{CoreError, ValidationError};
use fogon_db::DbError;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Machine-readable error code for the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    NoAttendance,
    InvalidTransition,
    PayrollAlreadyPaid,
    InsufficientStock,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::NoAttendance => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidTransition | ErrorCode::PayrollAlreadyPaid => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiError {
    pub success: bool,
    pub code: ErrorCode,
    pub message: String,
    /// Failure category, present on 500s.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let error = (code.status() == StatusCode::INTERNAL_SERVER_ERROR).then(|| format!("{:?}", code));
        ApiError {
            success: false,
            code,
            message: message.into(),
            error,
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::EmployeeNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::OrderLineNotFound(_)
            | CoreError::PayrollNotFound(_) => ApiError::new(ErrorCode::NotFound, message),
            // a missing type is a data problem the caller can fix
            CoreError::EmployeeTypeNotFound(_) => ApiError::validation(message),
            CoreError::NoAttendance { .. } => ApiError::new(ErrorCode::NoAttendance, message),
            CoreError::InsufficientStock { .. } => ApiError::new(ErrorCode::InsufficientStock, message),
            CoreError::InvalidTransition { .. } => ApiError::new(ErrorCode::InvalidTransition, message),
            CoreError::PayrollAlreadyPaid(_) => ApiError::new(ErrorCode::PayrollAlreadyPaid, message),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => e.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::PoolExhausted => ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted"),
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
