//! # Reservation Repository

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_id;
use fogon_core::validation::{validate_name, validate_quantity};
use fogon_core::Reservation;

const COLUMNS: &str =
    "id, code, customer_name, customer_phone, date, hour, party_size, active, notification_sent";

/// Input for a new reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub code: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub date: NaiveDate,
    pub hour: NaiveTime,
    pub party_size: i64,
}

/// Repository for reservations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Books a reservation.
    pub async fn insert(&self, input: NewReservation) -> DbResult<Reservation> {
        validate_name("code", &input.code)?;
        validate_name("customer_name", &input.customer_name)?;
        validate_quantity(input.party_size)?;

        let reservation = Reservation {
            id: new_id(),
            code: input.code.trim().to_string(),
            customer_name: input.customer_name.trim().to_string(),
            customer_phone: input
                .customer_phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            date: input.date,
            hour: input.hour,
            party_size: input.party_size,
            active: true,
            notification_sent: false,
        };

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, code, customer_name, customer_phone, date, hour,
                party_size, active, notification_sent
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, 0)
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.code)
        .bind(&reservation.customer_name)
        .bind(&reservation.customer_phone)
        .bind(reservation.date)
        .bind(reservation.hour)
        .bind(reservation.party_size)
        .execute(&self.pool)
        .await?;

        info!(id = %reservation.id, code = %reservation.code, date = %reservation.date, "Reservation booked");
        Ok(reservation)
    }

    /// Gets a reservation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = ?1");
        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reservation)
    }

    /// Active reservations on `date` that have not been notified yet, by hour.
    pub async fn pending_for_date(&self, date: NaiveDate) -> DbResult<Vec<Reservation>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE date = ?1 AND active = 1 AND notification_sent = 0 \
             ORDER BY hour"
        );
        let reservations = sqlx::query_as::<_, Reservation>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        debug!(date = %date, count = reservations.len(), "Loaded pending reservations");
        Ok(reservations)
    }

    /// Flags a reservation as notified.
    ///
    /// Returns `false` when it was already flagged, so a reminder is never
    /// recorded twice.
    pub async fn mark_notified(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE reservations SET notification_sent = 1 WHERE id = ?1 AND notification_sent = 0",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Cancels a reservation; cancelled reservations get no reminder.
    pub async fn cancel(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("UPDATE reservations SET active = 0 WHERE id = ?1 AND active = 1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
