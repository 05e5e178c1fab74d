//! # Attendance Repository
//!
//! One record per employee per work date.
//!
//! ## Record Shape by Status
//! ```text
//! status      check_in   check_out   counts as
//! ─────────   ────────   ─────────   ─────────
//! present     required   optional    attended
//! late        required   optional    attended
//! justified   required   optional    justified
//! absent      empty      empty       absent
//! day_off     empty      empty       (nothing)
//! ```

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use fogon_core::validation::validate_attendance_times;
use fogon_core::{AttendanceRecord, AttendanceStatus, CoreError, ValidationError};

const COLUMNS: &str =
    "id, employee_id, work_date, check_in, check_out, status, justification, created_at";

/// Input for a new attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub justification: Option<String>,
}

/// Listing filter; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

/// Repository for attendance records.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AttendanceRepository { pool }
    }

    /// Registers a day of attendance.
    ///
    /// ## Errors
    /// - check-in present/missing against the status rules → `Validation`
    /// - unknown employee → `EmployeeNotFound`
    /// - a record already exists for that employee and day → `Duplicate`
    pub async fn register(&self, input: NewAttendance) -> DbResult<AttendanceRecord> {
        validate_attendance_times(input.status, input.check_in, input.check_out)?;

        let employee: Option<String> = sqlx::query_scalar("SELECT id FROM employees WHERE id = ?1")
            .bind(&input.employee_id)
            .fetch_optional(&self.pool)
            .await?;
        if employee.is_none() {
            return Err(CoreError::EmployeeNotFound(input.employee_id).into());
        }

        let exists: Option<String> = sqlx::query_scalar(
            "SELECT id FROM attendances WHERE employee_id = ?1 AND work_date = ?2",
        )
        .bind(&input.employee_id)
        .bind(input.work_date)
        .fetch_optional(&self.pool)
        .await?;

        if exists.is_some() {
            return Err(ValidationError::Duplicate {
                field: "attendance".to_string(),
                value: format!("{} {}", input.employee_id, input.work_date),
            }
            .into());
        }

        let record = AttendanceRecord {
            id: new_id(),
            employee_id: input.employee_id,
            work_date: input.work_date,
            check_in: input.check_in,
            check_out: input.check_out,
            status: input.status,
            justification: input.justification,
            created_at: Utc::now(),
        };

        debug!(
            employee_id = %record.employee_id,
            work_date = %record.work_date,
            status = %record.status,
            "Registering attendance"
        );

        sqlx::query(
            r#"
            INSERT INTO attendances (
                id, employee_id, work_date, check_in, check_out, status, justification, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.id)
        .bind(&record.employee_id)
        .bind(record.work_date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.status)
        .bind(&record.justification)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<AttendanceRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM attendances WHERE id = ?1");
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Sets the check-out time.
    ///
    /// Only records that carry a check-in can be checked out.
    pub async fn record_check_out(&self, id: &str, check_out: NaiveTime) -> DbResult<AttendanceRecord> {
        let record = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Attendance", id))?;

        if record.check_in.is_none() {
            return Err(ValidationError::Required {
                field: "check_in".to_string(),
            }
            .into());
        }

        sqlx::query("UPDATE attendances SET check_out = ?2 WHERE id = ?1")
            .bind(id)
            .bind(check_out)
            .execute(&self.pool)
            .await?;

        info!(id = %id, check_out = %check_out, "Check-out recorded");

        Ok(AttendanceRecord {
            check_out: Some(check_out),
            ..record
        })
    }

    /// Changes the status of a record.
    ///
    /// Moving to `absent` or `day_off` clears both times.
    pub async fn update_status(
        &self,
        id: &str,
        status: AttendanceStatus,
        justification: Option<String>,
    ) -> DbResult<AttendanceRecord> {
        let record = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Attendance", id))?;

        let (check_in, check_out) = if status.is_timeless() {
            (None, None)
        } else {
            (record.check_in, record.check_out)
        };
        validate_attendance_times(status, check_in, check_out)?;

        let justification = justification.or(record.justification.clone());

        sqlx::query(
            "UPDATE attendances SET status = ?2, check_in = ?3, check_out = ?4, justification = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(check_in)
        .bind(check_out)
        .bind(&justification)
        .execute(&self.pool)
        .await?;

        info!(id = %id, from = %record.status, to = %status, "Attendance status changed");

        Ok(AttendanceRecord {
            status,
            check_in,
            check_out,
            justification,
            ..record
        })
    }

    /// Lists records matching `filter`, by work date then employee.
    pub async fn list(&self, filter: &AttendanceFilter) -> DbResult<Vec<AttendanceRecord>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM attendances WHERE 1 = 1"));

        if let Some(employee_id) = &filter.employee_id {
            builder.push(" AND employee_id = ").push_bind(employee_id.clone());
        }
        if let Some(from) = filter.from {
            builder.push(" AND work_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            builder.push(" AND work_date <= ").push_bind(to);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder.push(" ORDER BY work_date, employee_id");

        let records = builder
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Deletes a record.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM attendances WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Attendance", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Records of one employee within `[start, end]`.
    pub async fn in_range_in(
        conn: &mut SqliteConnection,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendances \
             WHERE employee_id = ?1 AND work_date >= ?2 AND work_date <= ?3 \
             ORDER BY work_date"
        );

        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(&mut *conn)
            .await?;

        Ok(records)
    }
}
