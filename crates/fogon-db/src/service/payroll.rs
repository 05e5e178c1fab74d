//! # Payroll Service
//!
//! Loads everything a payroll run needs, hands it to
//! [`fogon_core::payroll::compute`] and stores the result.
//!
//! ## Generation
//! ```text
//! generate(employee, month, year?)
//!     │  validate month / year, employee exists
//!     ▼
//! EmployeeLocks::acquire(employee)      one run per employee at a time
//!     │
//!     ▼  BEGIN
//! employee → type → settings → latest payroll → window → holidays → attendance
//!     │
//!     ▼
//! compute()  ── NoAttendance ──► rollback, nothing written
//!     │
//!     ▼
//! insert (new window) | update totals (reused window)
//! replace details
//!     │
//!     ▼  COMMIT
//! { payroll_id, gross_salary, net_salary }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::attendance::AttendanceRepository;
use crate::repository::employee::EmployeeRepository;
use crate::repository::holiday::HolidayRepository;
use crate::repository::payroll::{PayrollFilter, PayrollPage, PayrollRepository};
use crate::repository::settings::SettingsRepository;
use fogon_core::payroll::{compute, resolve_period, PayrollInput};
use fogon_core::validation::{validate_month, validate_year};
use fogon_core::{CoreError, Money, Payroll, PayrollDetail};

// =============================================================================
// Per-employee Locks
// =============================================================================

/// Async lock registry keyed by employee ID.
///
/// Two generation calls for the same employee would otherwise both see "no
/// payroll yet" and insert twice. An entry lives only while someone holds or
/// waits for it.
#[derive(Debug, Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<StdMutex<LockMap>>,
}

type LockMap = HashMap<String, Arc<Mutex<()>>>;

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the employee's lock; released when the guard drops.
    pub async fn acquire(&self, employee_id: &str) -> EmployeeGuard {
        let lock = {
            let mut map = lock_map(&self.inner);
            map.entry(employee_id.to_string()).or_default().clone()
        };
        EmployeeGuard {
            employee_id: employee_id.to_string(),
            registry: Arc::clone(&self.inner),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of employees currently locked or awaited.
    pub fn tracked(&self) -> usize {
        lock_map(&self.inner).len()
    }
}

/// Map access never awaits, so a poisoned map is still consistent.
fn lock_map(map: &StdMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held lock on one employee.
///
/// Dropping it releases the lock and forgets the entry when no other task
/// is waiting on it.
#[derive(Debug)]
pub struct EmployeeGuard {
    employee_id: String,
    registry: Arc<StdMutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EmployeeGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut map = lock_map(&self.registry);
        // Waiters clone the Arc under the map lock, so a count of one means
        // only the map itself still refers to it.
        if map.get(&self.employee_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&self.employee_id);
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPayroll {
    pub payroll_id: String,
    pub gross_salary: Money,
    pub net_salary: Money,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `false` when an unpaid payroll was recomputed in place.
    pub created: bool,
}

/// A payroll with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollWithDetails {
    #[serde(flatten)]
    pub payroll: Payroll,
    /// `HH:MM`
    pub worked_hours: String,
    /// `HH:MM`
    pub overtime_hours: String,
    pub details: Vec<PayrollDetail>,
}

// =============================================================================
// Service
// =============================================================================

/// Payroll generation and lifecycle.
#[derive(Debug, Clone)]
pub struct PayrollService {
    db: Database,
    locks: EmployeeLocks,
}

impl PayrollService {
    pub fn new(db: Database, locks: EmployeeLocks) -> Self {
        PayrollService { db, locks }
    }

    /// Generates (or recomputes) the employee's payroll, as of today.
    ///
    /// `year` defaults to the current year.
    pub async fn generate(&self, employee_id: &str, month: u32, year: Option<i32>) -> DbResult<GeneratedPayroll> {
        self.generate_as_of(employee_id, month, year, Local::now().date_naive())
            .await
    }

    /// Same as [`generate`](Self::generate) with an explicit "today".
    ///
    /// ## Errors
    /// - `Validation` for a month outside 1–12 or a year before 2000
    /// - `EmployeeNotFound`, `EmployeeTypeNotFound`
    /// - `NoAttendance` when the window has no present or late day
    pub async fn generate_as_of(
        &self,
        employee_id: &str,
        month: u32,
        year: Option<i32>,
        today: NaiveDate,
    ) -> DbResult<GeneratedPayroll> {
        validate_month(month)?;
        let year = year.unwrap_or_else(|| today.year());
        validate_year(year)?;

        // Unknown IDs are rejected before they reach the lock registry.
        {
            let mut conn = self.db.pool().acquire().await?;
            if EmployeeRepository::find_in(&mut conn, employee_id).await?.is_none() {
                return Err(CoreError::EmployeeNotFound(employee_id.to_string()).into());
            }
        }

        let _guard = self.locks.acquire(employee_id).await;
        debug!(employee_id = %employee_id, month, year, today = %today, "Generating payroll");

        let mut tx = self.db.pool().begin().await?;

        let employee = EmployeeRepository::find_in(&mut *tx, employee_id)
            .await?
            .ok_or_else(|| CoreError::EmployeeNotFound(employee_id.to_string()))?;
        let type_id = employee
            .employee_type_id
            .as_deref()
            .ok_or_else(|| CoreError::EmployeeTypeNotFound(employee_id.to_string()))?;
        let employee_type = EmployeeRepository::find_type_in(&mut *tx, type_id)
            .await?
            .ok_or_else(|| CoreError::EmployeeTypeNotFound(employee_id.to_string()))?;

        let settings = SettingsRepository::load_in(&mut *tx).await?;
        let latest = PayrollRepository::latest_in(&mut *tx, employee_id).await?;
        let period = resolve_period(latest.as_ref(), year, month, today)?;

        let holidays = HolidayRepository::for_month_of_in(&mut *tx, period.start).await?;
        let attendance =
            AttendanceRepository::in_range_in(&mut *tx, employee_id, period.start, period.end).await?;

        let computation = compute(PayrollInput {
            employee_id,
            employee_type: &employee_type,
            settings: &settings,
            holidays: &holidays,
            attendance: &attendance,
            period: &period,
        })?;

        let payroll_id = match &period.reuse {
            Some(id) => {
                PayrollRepository::update_totals_in(&mut *tx, id, &computation).await?;
                id.clone()
            }
            None => PayrollRepository::insert_in(&mut *tx, employee_id, &computation).await?,
        };
        PayrollRepository::replace_details_in(&mut *tx, &payroll_id, &computation.detail_lines()).await?;

        tx.commit().await?;

        info!(
            employee_id = %employee_id,
            payroll_id = %payroll_id,
            start = %computation.start,
            end = %computation.end,
            gross = %computation.gross_total,
            net = %computation.net_total,
            reused = period.reuse.is_some(),
            "Payroll generated"
        );

        Ok(GeneratedPayroll {
            payroll_id,
            gross_salary: computation.gross_total,
            net_salary: computation.net_total,
            start: computation.start,
            end: computation.end,
            created: period.reuse.is_none(),
        })
    }

    /// Lists payrolls.
    pub async fn list(&self, filter: &PayrollFilter) -> DbResult<PayrollPage> {
        self.db.payrolls().list(filter).await
    }

    /// A payroll with its details.
    pub async fn get(&self, id: &str) -> DbResult<PayrollWithDetails> {
        let payrolls = self.db.payrolls();
        let payroll = payrolls
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::PayrollNotFound(id.to_string()))?;
        let details = payrolls.details(id).await?;
        Ok(PayrollWithDetails {
            worked_hours: payroll.worked_hours(),
            overtime_hours: payroll.overtime_hours(),
            payroll,
            details,
        })
    }

    /// Marks a payroll as paid; its window is closed from then on.
    pub async fn mark_paid(&self, id: &str) -> DbResult<Payroll> {
        self.db.payrolls().mark_paid(id).await
    }

    /// Deletes an unpaid payroll.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.db.payrolls().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Weekday};

    use super::*;
    use crate::repository::attendance::NewAttendance;
    use crate::{DbConfig, DbError};
    use fogon_core::{AttendanceStatus, DetailKind, EmployeeType, PaymentType};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn cook_type(bonus: bool) -> EmployeeType {
        EmployeeType {
            id: crate::repository::new_id(),
            name: "Cocinero".to_string(),
            payment_type: PaymentType::Fixed,
            base_salary_cents: Some(300_000),
            hourly_rate_cents: None,
            shift_minutes: 480,
            overtime_rate_bps: 15_000,
            has_punctuality_bonus: bonus,
            punctuality_bonus_cents: Some(5_000),
            active: true,
        }
    }

    async fn setup(bonus: bool) -> (Database, PayrollService, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let employee_type = cook_type(bonus);
        db.employees().insert_type(&employee_type).await.unwrap();
        let employee = db
            .employees()
            .create("Lucía Quispe", "EMP-001", Some(&employee_type.id))
            .await
            .unwrap();
        let service = PayrollService::new(db.clone(), EmployeeLocks::new());
        (db, service, employee.id)
    }

    /// Working days of March 2025 (Sundays are the default day off).
    fn march_working_days() -> Vec<NaiveDate> {
        (1..=31)
            .map(|d| date(3, d))
            .filter(|d| d.weekday() != Weekday::Sun)
            .collect()
    }

    async fn attend(db: &Database, employee_id: &str, day: NaiveDate, status: AttendanceStatus) {
        let timed = !status.is_timeless();
        db.attendance()
            .register(NewAttendance {
                employee_id: employee_id.to_string(),
                work_date: day,
                check_in: timed.then(|| time(9, 0)),
                check_out: timed.then(|| time(17, 0)),
                status,
                justification: None,
            })
            .await
            .unwrap();
    }

    /// 26 working days: one absence, one justified, the rest present.
    async fn seed_march(db: &Database, employee_id: &str) {
        for (i, day) in march_working_days().into_iter().enumerate() {
            let status = match i {
                0 => AttendanceStatus::Absent,
                1 => AttendanceStatus::Justified,
                _ => AttendanceStatus::Present,
            };
            attend(db, employee_id, day, status).await;
        }
    }

    #[tokio::test]
    async fn test_generate_fixed_salary_month() {
        let (db, service, employee_id) = setup(true).await;
        seed_march(&db, &employee_id).await;

        let result = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap();

        // daily = 3000 / 26, gross = 3000 - daily, AFP 12 %
        assert!(result.created);
        assert_eq!(result.start, date(3, 1));
        assert_eq!(result.end, date(3, 31));
        assert_eq!(result.gross_salary, Money::from_cents(288_462));
        assert_eq!(result.net_salary, Money::from_cents(253_847));

        let stored = service.get(&result.payroll_id).await.unwrap();
        assert_eq!(stored.payroll.days_present, 24);
        assert_eq!(stored.payroll.days_absent, 1);
        assert_eq!(stored.payroll.days_justified, 1);
        assert_eq!(stored.payroll.absence_discount_cents, 11_538);
        assert_eq!(stored.payroll.afp_discount_cents, 34_615);
        // an absence forfeits the punctuality bonus
        assert_eq!(stored.payroll.bonuses_cents, 0);
        assert_eq!(stored.details.len(), 3);
    }

    #[tokio::test]
    async fn test_punctuality_bonus_adds_detail_line() {
        let (db, service, employee_id) = setup(true).await;
        for day in march_working_days() {
            attend(&db, &employee_id, day, AttendanceStatus::Present).await;
        }

        let result = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap();

        // 3000 gross, 360 AFP, +50 bonus on both
        assert_eq!(result.gross_salary, Money::from_major(3050));
        assert_eq!(result.net_salary, Money::from_major(2690));

        let stored = service.get(&result.payroll_id).await.unwrap();
        assert_eq!(stored.details.len(), 4);
        assert!(stored
            .details
            .iter()
            .any(|d| d.concept == "Punctuality bonus" && d.kind == DetailKind::Income));
    }

    #[tokio::test]
    async fn test_regenerate_unpaid_is_stable() {
        let (db, service, employee_id) = setup(false).await;
        seed_march(&db, &employee_id).await;

        let first = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap();
        let second = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(first.payroll_id, second.payroll_id);
        assert_eq!(first.gross_salary, second.gross_salary);
        assert_eq!(first.net_salary, second.net_salary);
        assert_eq!(db.payrolls().details(&first.payroll_id).await.unwrap().len(), 3);
        assert_eq!(service.list(&PayrollFilter::default()).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_no_attendance_writes_nothing() {
        let (db, service, employee_id) = setup(false).await;

        let err = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::NoAttendance { .. })));
        assert_eq!(db.payrolls().list(&PayrollFilter::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_paid_payroll_starts_next_window() {
        let (db, service, employee_id) = setup(false).await;
        seed_march(&db, &employee_id).await;

        let march = service
            .generate_as_of(&employee_id, 3, Some(2025), date(4, 2))
            .await
            .unwrap();
        service.mark_paid(&march.payroll_id).await.unwrap();

        let err = service
            .generate_as_of(&employee_id, 4, Some(2025), date(4, 2))
            .await
            .unwrap_err();
        match err {
            DbError::Domain(CoreError::NoAttendance { start, end, .. }) => {
                assert_eq!(start, date(4, 1));
                assert_eq!(end, date(4, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let stored = db.payrolls().get_by_id(&march.payroll_id).await.unwrap().unwrap();
        assert!(stored.paid);
        assert!(service.delete(&march.payroll_id).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_employee_and_missing_type() {
        let (db, service, _) = setup(false).await;

        let err = service
            .generate_as_of("ghost", 3, Some(2025), date(4, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmployeeNotFound(_))));

        let untyped = db.employees().create("Sin Tipo", "EMP-099", None).await.unwrap();
        let err = service
            .generate_as_of(&untyped.id, 3, Some(2025), date(4, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmployeeTypeNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_month_and_year() {
        let (_db, service, employee_id) = setup(false).await;

        assert!(service.generate_as_of(&employee_id, 13, Some(2025), date(4, 2)).await.is_err());
        assert!(service.generate_as_of(&employee_id, 3, Some(1999), date(4, 2)).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_generation_creates_one_payroll() {
        let (db, service, employee_id) = setup(false).await;
        seed_march(&db, &employee_id).await;

        let (a, b) = tokio::join!(
            service.generate_as_of(&employee_id, 3, Some(2025), date(4, 2)),
            service.generate_as_of(&employee_id, 3, Some(2025), date(4, 2)),
        );

        assert_eq!(a.unwrap().payroll_id, b.unwrap().payroll_id);
        assert_eq!(service.list(&PayrollFilter::default()).await.unwrap().total, 1);
        assert_eq!(service.locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_lock_entries_are_released() {
        let locks = EmployeeLocks::new();
        for i in 0..10_000 {
            drop(locks.acquire(&format!("no-such-employee-{i}")).await);
        }
        assert_eq!(locks.tracked(), 0);

        let held = locks.acquire("emp-1").await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("emp-1").await;
            })
        };
        tokio::task::yield_now().await;
        assert_eq!(locks.tracked(), 1);

        drop(held);
        waiter.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_unknown_employees_never_reach_the_lock_registry() {
        let (_db, service, _) = setup(false).await;

        for i in 0..50 {
            let err = service
                .generate_as_of(&format!("ghost-{i}"), 3, Some(2025), date(4, 2))
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::EmployeeNotFound(_))));
        }
        assert_eq!(service.locks.tracked(), 0);
    }
}
