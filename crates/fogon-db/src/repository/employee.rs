//! # Employee Repository
//!
//! Employees and the employee types that carry their compensation rules.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use fogon_core::validation::validate_name;
use fogon_core::{Employee, EmployeeType};

const EMPLOYEE_COLUMNS: &str = "id, name, code, employee_type_id, created_at";

const TYPE_COLUMNS: &str = "id, name, payment_type, base_salary_cents, hourly_rate_cents, \
     shift_minutes, overtime_rate_bps, has_punctuality_bonus, punctuality_bonus_cents, active";

/// Repository for employees and employee types.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee type.
    pub async fn insert_type(&self, employee_type: &EmployeeType) -> DbResult<()> {
        validate_name("name", &employee_type.name)?;
        debug!(id = %employee_type.id, name = %employee_type.name, "Inserting employee type");

        sqlx::query(
            r#"
            INSERT INTO employee_types (
                id, name, payment_type, base_salary_cents, hourly_rate_cents,
                shift_minutes, overtime_rate_bps, has_punctuality_bonus,
                punctuality_bonus_cents, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&employee_type.id)
        .bind(&employee_type.name)
        .bind(employee_type.payment_type)
        .bind(employee_type.base_salary_cents)
        .bind(employee_type.hourly_rate_cents)
        .bind(employee_type.shift_minutes)
        .bind(employee_type.overtime_rate_bps)
        .bind(employee_type.has_punctuality_bonus)
        .bind(employee_type.punctuality_bonus_cents)
        .bind(employee_type.active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Creates an employee.
    pub async fn create(
        &self,
        name: &str,
        code: &str,
        employee_type_id: Option<&str>,
    ) -> DbResult<Employee> {
        validate_name("name", name)?;
        validate_name("code", code)?;

        let employee = Employee {
            id: new_id(),
            name: name.trim().to_string(),
            code: code.trim().to_string(),
            employee_type_id: employee_type_id.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %employee.id, code = %employee.code, "Creating employee");

        sqlx::query(
            "INSERT INTO employees (id, name, code, employee_type_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.code)
        .bind(&employee.employee_type_id)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Gets an employee type by ID.
    pub async fn get_type(&self, id: &str) -> DbResult<Option<EmployeeType>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_type_in(&mut conn, id).await
    }

    /// Lists employees whose name or code contains `search`.
    pub async fn search(&self, search: &str) -> DbResult<Vec<Employee>> {
        let pattern = format!("%{}%", search.trim());
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE name LIKE ?1 OR code LIKE ?1 ORDER BY name"
        );

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    /// Counts employees.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Loads an employee on the caller's connection.
    pub async fn find_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(employee)
    }

    /// Loads an employee type on the caller's connection.
    pub async fn find_type_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<EmployeeType>> {
        let sql = format!("SELECT {TYPE_COLUMNS} FROM employee_types WHERE id = ?1");
        let employee_type = sqlx::query_as::<_, EmployeeType>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(employee_type)
    }
}
