//! # Settings Repository
//!
//! Key/value payroll settings, loaded into a typed [`PayrollSettings`].

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use fogon_core::settings::{KEYS, KEY_AFP, KEY_ESSALUD};
use fogon_core::validation::validate_rate_bps;
use fogon_core::{PayrollSettings, ValidationError};

/// Repository for payroll settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the typed settings.
    pub async fn load(&self) -> DbResult<PayrollSettings> {
        let mut conn = self.pool.acquire().await?;
        Self::load_in(&mut conn).await
    }

    /// Stored `(key, value)` pairs, by key.
    pub async fn all(&self) -> DbResult<Vec<(String, String)>> {
        let pairs = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM payroll_settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pairs)
    }

    /// Sets one setting.
    ///
    /// The value is parsed first; an invalid value or unknown key is never
    /// stored.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<PayrollSettings> {
        if !KEYS.contains(&key) {
            return Err(ValidationError::NotAllowed {
                field: "key".to_string(),
                allowed: KEYS.iter().map(|k| k.to_string()).collect(),
            }
            .into());
        }
        let parsed = PayrollSettings::from_pairs([(key, value)])?;
        match key {
            KEY_AFP => validate_rate_bps(KEY_AFP, parsed.afp.bps())?,
            KEY_ESSALUD => validate_rate_bps(KEY_ESSALUD, parsed.essalud.bps())?,
            _ => {}
        }

        sqlx::query(
            "INSERT INTO payroll_settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value.trim())
        .execute(&self.pool)
        .await?;

        info!(key = %key, value = %value, "Payroll setting updated");
        self.load().await
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Loads the typed settings on the caller's connection.
    pub async fn load_in(conn: &mut SqliteConnection) -> DbResult<PayrollSettings> {
        let pairs = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM payroll_settings")
            .fetch_all(&mut *conn)
            .await?;

        let settings =
            PayrollSettings::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

        debug!(
            afp_bps = settings.afp.bps(),
            essalud_bps = settings.essalud.bps(),
            day_offs = settings.day_offs.len(),
            "Loaded payroll settings"
        );
        Ok(settings)
    }
}
