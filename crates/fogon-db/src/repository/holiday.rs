//! # Holiday Repository

use chrono::{Datelike, NaiveDate};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use fogon_core::calendar::end_of_month;
use fogon_core::validation::{validate_name, validate_year};
use fogon_core::Holiday;

const COLUMNS: &str = "id, name, date, is_recurring";

/// Repository for holidays.
#[derive(Debug, Clone)]
pub struct HolidayRepository {
    pool: SqlitePool,
}

impl HolidayRepository {
    /// Creates a new HolidayRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HolidayRepository { pool }
    }

    /// Creates a holiday.
    pub async fn create(&self, name: &str, date: NaiveDate, is_recurring: bool) -> DbResult<Holiday> {
        validate_name("name", name)?;

        let holiday = Holiday {
            id: new_id(),
            name: name.trim().to_string(),
            date,
            is_recurring,
        };

        sqlx::query("INSERT INTO holidays (id, name, date, is_recurring) VALUES (?1, ?2, ?3, ?4)")
            .bind(&holiday.id)
            .bind(&holiday.name)
            .bind(holiday.date)
            .bind(holiday.is_recurring)
            .execute(&self.pool)
            .await?;

        info!(id = %holiday.id, date = %holiday.date, recurring = is_recurring, "Holiday created");
        Ok(holiday)
    }

    /// Holidays that fall in `year`: that year's one-off dates plus every
    /// recurring holiday.
    pub async fn list_by_year(&self, year: i32) -> DbResult<Vec<Holiday>> {
        validate_year(year)?;

        let sql = format!(
            "SELECT {COLUMNS} FROM holidays \
             WHERE is_recurring = 1 OR strftime('%Y', date) = ?1 \
             ORDER BY strftime('%m-%d', date), name"
        );

        let holidays = sqlx::query_as::<_, Holiday>(&sql)
            .bind(format!("{:04}", year))
            .fetch_all(&self.pool)
            .await?;

        debug!(year, count = holidays.len(), "Listed holidays");
        Ok(holidays)
    }

    /// Deletes a holiday.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Holiday", id));
        }

        info!(id = %id, "Holiday deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Holidays that can affect the laborable days of the month starting
    /// at `start`: one-off dates up to the end of that month, and every
    /// recurring holiday.
    pub async fn for_month_of_in(conn: &mut SqliteConnection, start: NaiveDate) -> DbResult<Vec<Holiday>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM holidays \
             WHERE is_recurring = 1 OR (date >= ?1 AND date <= ?2)"
        );

        let holidays = sqlx::query_as::<_, Holiday>(&sql)
            .bind(start)
            .bind(end_of_month(start))
            .fetch_all(&mut *conn)
            .await?;

        debug!(month = start.month(), count = holidays.len(), "Loaded holidays");
        Ok(holidays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_by_year_includes_recurring() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.holidays().create("Navidad", date(2019, 12, 25), true).await.unwrap();
        db.holidays().create("Día del Trabajo", date(2025, 5, 1), false).await.unwrap();
        db.holidays().create("Elecciones", date(2026, 4, 12), false).await.unwrap();

        let holidays = db.holidays().list_by_year(2025).await.unwrap();
        let names: Vec<_> = holidays.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Día del Trabajo", "Navidad"]);
    }

    #[tokio::test]
    async fn test_for_month_of_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.holidays().create("Navidad", date(2019, 12, 25), true).await.unwrap();
        db.holidays().create("Día del Trabajo", date(2025, 5, 1), false).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let may = HolidayRepository::for_month_of_in(&mut conn, date(2025, 5, 1)).await.unwrap();
        assert_eq!(may.len(), 2);
        assert!(may.iter().any(|h| h.matches(date(2025, 5, 1))));

        let june = HolidayRepository::for_month_of_in(&mut conn, date(2025, 6, 1)).await.unwrap();
        assert_eq!(june.len(), 1);
        assert!(june[0].is_recurring);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let holiday = db.holidays().create("Navidad", date(2019, 12, 25), true).await.unwrap();

        db.holidays().delete(&holiday.id).await.unwrap();
        assert!(matches!(
            db.holidays().delete(&holiday.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
