//! # Request and Response Bodies
//!
//! DTOs consumed by the admin frontend carry `#[ts(export)]` so their
//! TypeScript definitions are regenerated on `cargo test`.

use chrono::NaiveDate;
use fogon_db::service::payroll::GeneratedPayroll;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// `POST /payrolls/generate`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneratePayrollRequest {
    pub employee_id: String,
    pub month: u32,
    /// Defaults to the current year.
    #[ts(optional)]
    pub year: Option<i32>,
}

/// Successful generation.
///
/// Salaries are in soles; the `_cents` twins are exact.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneratePayrollResponse {
    pub success: bool,
    pub payroll_id: String,
    pub gross_salary: f64,
    pub net_salary: f64,
    pub gross_salary_cents: i64,
    pub net_salary_cents: i64,
    pub start_date: String,
    pub end_date: String,
    /// `false` when an unpaid payroll was recomputed.
    pub created: bool,
}

impl From<GeneratedPayroll> for GeneratePayrollResponse {
    fn from(g: GeneratedPayroll) -> Self {
        GeneratePayrollResponse {
            success: true,
            payroll_id: g.payroll_id,
            gross_salary: g.gross_salary.as_soles_f64(),
            net_salary: g.net_salary.as_soles_f64(),
            gross_salary_cents: g.gross_salary.cents(),
            net_salary_cents: g.net_salary.cents(),
            start_date: g.start.to_string(),
            end_date: g.end.to_string(),
            created: g.created,
        }
    }
}

/// `PATCH /order-lines/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateLineStateRequest {
    /// `pending`, `in_preparation`, `in_delivery`, `completed` or `cancelled`.
    pub state: String,
}

/// `POST /products/{id}/stock`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiveStockRequest {
    pub quantity: i64,
    #[ts(optional)]
    pub batch: Option<String>,
    #[ts(optional, as = "Option<String>")]
    pub expiration_date: Option<NaiveDate>,
    #[ts(optional)]
    pub unit_price_cents: Option<i64>,
}

/// `POST /attendances`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterAttendanceRequest {
    pub employee_id: String,
    #[ts(as = "String")]
    pub work_date: NaiveDate,
    /// `present`, `late`, `absent`, `justified` or `day_off`.
    pub status: String,
    /// `HH:MM`
    #[ts(optional)]
    pub check_in: Option<String>,
    /// `HH:MM`
    #[ts(optional)]
    pub check_out: Option<String>,
    #[ts(optional)]
    pub justification: Option<String>,
}

/// `PATCH /attendances/{id}`
///
/// A status change is applied before the check-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateAttendanceRequest {
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    pub check_out: Option<String>,
    #[ts(optional)]
    pub justification: Option<String>,
}

/// `POST /holidays`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateHolidayRequest {
    pub name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Repeats every year on the same month and day.
    #[serde(default)]
    pub is_recurring: bool,
}

/// `GET /holidays?year=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// `PUT /payroll-settings/{key}`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSettingRequest {
    pub value: String,
}

/// `{message, data}` envelope for state-changing calls.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        MessageResponse {
            message: message.into(),
            data,
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
    pub migrations_applied: u32,
    pub migrations_total: u32,
}
