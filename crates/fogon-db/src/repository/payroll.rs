//! # Payroll Repository
//!
//! Stored payrolls and their line items.
//!
//! Generation goes through [`PayrollService`](crate::service::payroll::PayrollService),
//! which calls the `*_in` functions here inside one transaction. The pool
//! methods cover reads, listing and the paid flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use fogon_core::payroll::{DetailLine, PayrollComputation};
use fogon_core::validation::{validate_month, validate_search_query, validate_year};
use fogon_core::{CoreError, Payroll, PayrollDetail};

const COLUMNS: &str = "p.id, p.employee_id, p.start_date, p.end_date, p.base_salary_cents, \
     p.laborable_days, p.days_present, p.days_absent, p.days_justified, p.worked_minutes, \
     p.overtime_minutes, p.overtime_payment_cents, p.bonuses_cents, p.absence_discount_cents, \
     p.proportional_base_cents, p.gross_total_cents, p.afp_discount_cents, \
     p.essalud_contribution_cents, p.net_total_cents, p.paid, p.created_at, p.updated_at";

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Listing filter.
///
/// `month` and `year` match the payroll's start date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollFilter {
    /// Substring of the employee's name or code.
    pub search: Option<String>,
    pub paid: Option<bool>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// 1-based.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// A payroll with the employee it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PayrollRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payroll: Payroll,
    pub employee_name: String,
    pub employee_code: String,
}

/// One page of payrolls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollPage {
    pub items: Vec<PayrollRow>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Repository for payrolls.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    pool: SqlitePool,
}

impl PayrollRepository {
    /// Creates a new PayrollRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PayrollRepository { pool }
    }

    /// Gets a payroll by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Payroll>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Line items of a payroll, incomes first.
    pub async fn details(&self, payroll_id: &str) -> DbResult<Vec<PayrollDetail>> {
        let details = sqlx::query_as::<_, PayrollDetail>(
            "SELECT id, payroll_id, concept, amount_cents, kind, created_at \
             FROM payroll_details WHERE payroll_id = ?1 \
             ORDER BY CASE kind WHEN 'income' THEN 0 ELSE 1 END, concept",
        )
        .bind(payroll_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(details)
    }

    /// Lists payrolls, newest period first.
    pub async fn list(&self, filter: &PayrollFilter) -> DbResult<PayrollPage> {
        if let Some(month) = filter.month {
            validate_month(month)?;
        }
        if let Some(year) = filter.year {
            validate_year(year)?;
        }
        let search = match filter.search.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(validate_search_query(s)?),
            _ => None,
        };

        let page = filter.page.unwrap_or(1).max(1);
        let per_page = filter.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        // Widened first: page comes from the query string unbounded.
        let offset = (i64::from(page) - 1) * i64::from(per_page);

        let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) FROM payrolls p JOIN employees e ON e.id = p.employee_id",
        );
        push_filters(&mut count_query, filter, search.as_deref());
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {COLUMNS}, e.name AS employee_name, e.code AS employee_code \
             FROM payrolls p JOIN employees e ON e.id = p.employee_id"
        ));
        push_filters(&mut query, filter, search.as_deref());
        query
            .push(" ORDER BY p.start_date DESC, e.name LIMIT ")
            .push_bind(i64::from(per_page))
            .push(" OFFSET ")
            .push_bind(offset);

        let items = query
            .build_query_as::<PayrollRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(total, page, per_page, returned = items.len(), "Listed payrolls");

        Ok(PayrollPage {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Marks a payroll as paid.
    ///
    /// Paying twice is an error so double payments surface.
    pub async fn mark_paid(&self, id: &str) -> DbResult<Payroll> {
        let mut tx = self.pool.begin().await?;

        let payroll = Self::find_in(&mut *tx, id)
            .await?
            .ok_or(CoreError::PayrollNotFound(id.to_string()))?;
        if payroll.paid {
            return Err(CoreError::PayrollAlreadyPaid(id.to_string()).into());
        }

        let now = Utc::now();
        sqlx::query("UPDATE payrolls SET paid = 1, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %id, net = %payroll.net_total(), "Payroll marked as paid");
        Ok(Payroll {
            paid: true,
            updated_at: now,
            ..payroll
        })
    }

    /// Deletes an unpaid payroll and its details.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let payroll = Self::find_in(&mut *tx, id)
            .await?
            .ok_or(CoreError::PayrollNotFound(id.to_string()))?;
        if payroll.paid {
            return Err(CoreError::PayrollAlreadyPaid(id.to_string()).into());
        }

        sqlx::query("DELETE FROM payroll_details WHERE payroll_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payrolls WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %id, "Payroll deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Loads a payroll on the caller's connection.
    pub async fn find_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Payroll>> {
        let sql = format!("SELECT {COLUMNS} FROM payrolls p WHERE p.id = ?1");
        let payroll = sqlx::query_as::<_, Payroll>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(payroll)
    }

    /// The employee's payroll with the latest end date.
    pub async fn latest_in(conn: &mut SqliteConnection, employee_id: &str) -> DbResult<Option<Payroll>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM payrolls p WHERE p.employee_id = ?1 \
             ORDER BY p.end_date DESC, p.created_at DESC LIMIT 1"
        );
        let payroll = sqlx::query_as::<_, Payroll>(&sql)
            .bind(employee_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(payroll)
    }

    /// Inserts a new payroll for the computed window.
    pub async fn insert_in(
        conn: &mut SqliteConnection,
        employee_id: &str,
        computation: &PayrollComputation,
    ) -> DbResult<String> {
        let id = new_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO payrolls (
                id, employee_id, start_date, end_date, base_salary_cents, laborable_days,
                days_present, days_absent, days_justified, worked_minutes, overtime_minutes,
                overtime_payment_cents, bonuses_cents, absence_discount_cents,
                proportional_base_cents, gross_total_cents, afp_discount_cents,
                essalud_contribution_cents, net_total_cents, paid, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                      ?18, ?19, 0, ?20, ?20)
            "#,
        )
        .bind(&id)
        .bind(employee_id)
        .bind(computation.start)
        .bind(computation.end)
        .bind(computation.base_salary.cents())
        .bind(computation.laborable_days)
        .bind(computation.days_present)
        .bind(computation.days_absent)
        .bind(computation.days_justified)
        .bind(computation.worked_minutes)
        .bind(computation.overtime_minutes)
        .bind(computation.overtime_payment.cents())
        .bind(computation.bonuses.cents())
        .bind(computation.absence_discount.cents())
        .bind(computation.proportional_base.cents())
        .bind(computation.gross_total.cents())
        .bind(computation.afp_discount.cents())
        .bind(computation.essalud_contribution.cents())
        .bind(computation.net_total.cents())
        .bind(now)
        .execute(&mut *conn)
        .await?;

        debug!(id = %id, employee_id = %employee_id, start = %computation.start, end = %computation.end, "Inserted payroll");
        Ok(id)
    }

    /// Overwrites the figures of an existing payroll.
    ///
    /// The stored start and end dates stay as they are.
    pub async fn update_totals_in(
        conn: &mut SqliteConnection,
        id: &str,
        computation: &PayrollComputation,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE payrolls SET
                base_salary_cents = ?2, laborable_days = ?3, days_present = ?4,
                days_absent = ?5, days_justified = ?6, worked_minutes = ?7,
                overtime_minutes = ?8, overtime_payment_cents = ?9, bonuses_cents = ?10,
                absence_discount_cents = ?11, proportional_base_cents = ?12,
                gross_total_cents = ?13, afp_discount_cents = ?14,
                essalud_contribution_cents = ?15, net_total_cents = ?16, updated_at = ?17
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(computation.base_salary.cents())
        .bind(computation.laborable_days)
        .bind(computation.days_present)
        .bind(computation.days_absent)
        .bind(computation.days_justified)
        .bind(computation.worked_minutes)
        .bind(computation.overtime_minutes)
        .bind(computation.overtime_payment.cents())
        .bind(computation.bonuses.cents())
        .bind(computation.absence_discount.cents())
        .bind(computation.proportional_base.cents())
        .bind(computation.gross_total.cents())
        .bind(computation.afp_discount.cents())
        .bind(computation.essalud_contribution.cents())
        .bind(computation.net_total.cents())
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Payroll", id));
        }

        debug!(id = %id, "Updated payroll totals");
        Ok(())
    }

    /// Replaces every line item of a payroll.
    pub async fn replace_details_in(
        conn: &mut SqliteConnection,
        payroll_id: &str,
        lines: &[DetailLine],
    ) -> DbResult<()> {
        sqlx::query("DELETE FROM payroll_details WHERE payroll_id = ?1")
            .bind(payroll_id)
            .execute(&mut *conn)
            .await?;

        let now: DateTime<Utc> = Utc::now();
        for line in lines {
            sqlx::query(
                "INSERT INTO payroll_details (id, payroll_id, concept, amount_cents, kind, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(new_id())
            .bind(payroll_id)
            .bind(&line.concept)
            .bind(line.amount.cents())
            .bind(line.kind)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }

        debug!(payroll_id = %payroll_id, lines = lines.len(), "Replaced payroll details");
        Ok(())
    }
}

/// Appends the `WHERE` clause shared by the count and page queries.
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &PayrollFilter, search: Option<&str>) {
    builder.push(" WHERE 1 = 1");
    if let Some(search) = search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (e.name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR e.code LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(paid) = filter.paid {
        builder.push(" AND p.paid = ").push_bind(paid);
    }
    if let Some(month) = filter.month {
        builder
            .push(" AND strftime('%m', p.start_date) = ")
            .push_bind(format!("{:02}", month));
    }
    if let Some(year) = filter.year {
        builder
            .push(" AND strftime('%Y', p.start_date) = ")
            .push_bind(format!("{:04}", year));
    }
}
