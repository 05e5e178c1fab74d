//! # Payroll Engine
//!
//! Pure payroll computation for one employee and one period. The caller
//! loads employee type, settings, holidays and attendance; this module does
//! the arithmetic and nothing else.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_period(latest payroll, year, month, today)                     │
//! │        │  unpaid latest → reuse its window (end clamped to today)       │
//! │        │  otherwise     → new window after the latest, or month start   │
//! │        ▼                                                                │
//! │  laborable days [start, end of start's month]  − holidays − day-offs    │
//! │        │  total = all of them, elapsed = those ≤ end                    │
//! │        ▼                                                                │
//! │  attendance in [start, end]                                             │
//! │        │  present+late = 0 → NoAttendance                               │
//! │        ▼                                                                │
//! │  worked / overtime minutes (excess over shift, per day)                 │
//! │        ▼                                                                │
//! │  FIXED:  daily = base / total        HOURLY: base = rate × hours        │
//! │          base  = daily × elapsed             no absence discount        │
//! │          − daily × absent                                               │
//! │        ▼                                                                │
//! │  + overtime pay → gross → AFP → net → (+ punctuality bonus)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every intermediate figure is an exact `Decimal`. Gross, overtime,
//! absence discount, proportional base, AFP and ESSALUD are each rounded to
//! céntimos once; net is `gross − AFP` on the rounded figures so the payslip
//! always adds up.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{end_of_month, first_day_of_month, laborable_days};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::settings::PayrollSettings;
use crate::types::{AttendanceRecord, AttendanceStatus, DetailKind, EmployeeType, Holiday, PaymentType, Payroll};

// =============================================================================
// Period Resolution
// =============================================================================

/// The window a payroll run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollPeriod {
    pub start: NaiveDate,
    /// Inclusive; never after `today`.
    pub end: NaiveDate,
    /// Set when the employee's latest unpaid payroll is recomputed in place.
    pub reuse: Option<String>,
}

/// Decides which window a generation call computes.
///
/// ## Rules
/// - Latest payroll unpaid: same start, end clamped to `today`. The stored
///   dates of that payroll are left as they are.
/// - Latest payroll paid: starts the day after it ended.
/// - No payroll yet: starts on the first of the requested month.
/// - A new window ends at the end of the requested month or `today`,
///   whichever comes first.
pub fn resolve_period(
    latest: Option<&Payroll>,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> CoreResult<PayrollPeriod> {
    if let Some(prior) = latest.filter(|p| !p.paid) {
        return Ok(PayrollPeriod {
            start: prior.start_date,
            end: prior.end_date.min(today),
            reuse: Some(prior.id.clone()),
        });
    }

    let month_start = first_day_of_month(year, month)?;
    let start = match latest {
        Some(prior) => prior
            .end_date
            .checked_add_days(Days::new(1))
            .unwrap_or(prior.end_date),
        None => month_start,
    };

    Ok(PayrollPeriod {
        start,
        end: end_of_month(month_start).min(today),
        reuse: None,
    })
}

// =============================================================================
// Computation
// =============================================================================

/// Everything the engine needs, already loaded.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInput<'a> {
    pub employee_id: &'a str,
    pub employee_type: &'a EmployeeType,
    pub settings: &'a PayrollSettings,
    pub holidays: &'a [Holiday],
    pub attendance: &'a [AttendanceRecord],
    pub period: &'a PayrollPeriod,
}

/// Result of a payroll run, rounded to céntimos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputation {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Salary (fixed) or hourly rate (hourly) used for the run.
    pub base_salary: Money,
    pub laborable_days: i64,
    pub days_elapsed: i64,
    pub days_present: i64,
    pub days_absent: i64,
    pub days_justified: i64,
    pub worked_minutes: i64,
    pub overtime_minutes: i64,
    pub overtime_payment: Money,
    pub absence_discount: Money,
    pub proportional_base: Money,
    pub bonuses: Money,
    pub gross_total: Money,
    pub afp_discount: Money,
    pub essalud_contribution: Money,
    pub net_total: Money,
}

/// A payroll line item before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    pub concept: String,
    pub amount: Money,
    pub kind: DetailKind,
}

pub const CONCEPT_OVERTIME: &str = "Overtime";
pub const CONCEPT_ABSENCE: &str = "Absence discount";
pub const CONCEPT_AFP: &str = "AFP";
pub const CONCEPT_PUNCTUALITY: &str = "Punctuality bonus";

/// Counts and minutes taken from attendance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct AttendanceTally {
    present: i64,
    absent: i64,
    justified: i64,
    worked_minutes: i64,
    overtime_minutes: i64,
}

fn tally(records: &[AttendanceRecord], period: &PayrollPeriod, shift_minutes: i64) -> AttendanceTally {
    let mut t = AttendanceTally::default();

    for record in records
        .iter()
        .filter(|r| r.work_date >= period.start && r.work_date <= period.end)
    {
        match record.status {
            AttendanceStatus::Present | AttendanceStatus::Late => {
                t.present += 1;
                if let Some(minutes) = record.worked_minutes() {
                    t.worked_minutes += minutes;
                    t.overtime_minutes += (minutes - shift_minutes).max(0);
                }
            }
            AttendanceStatus::Absent => t.absent += 1,
            AttendanceStatus::Justified => t.justified += 1,
            AttendanceStatus::DayOff => {}
        }
    }

    t
}

fn hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Computes a payroll.
///
/// ## Errors
/// `NoAttendance` when the window holds no present or late day.
pub fn compute(input: PayrollInput<'_>) -> CoreResult<PayrollComputation> {
    let employee_type = input.employee_type;
    let period = input.period;

    let laborable = laborable_days(period.start, input.holidays, &input.settings.day_offs);
    let total_laborable = laborable.len() as i64;
    let days_elapsed = laborable.iter().filter(|d| **d <= period.end).count() as i64;

    let t = tally(input.attendance, period, employee_type.shift_minutes);
    if t.present == 0 {
        return Err(CoreError::NoAttendance {
            employee_id: input.employee_id.to_string(),
            start: period.start,
            end: period.end,
        });
    }

    let overtime_rate = employee_type.overtime_rate().fraction();
    let extra_hours = hours(t.overtime_minutes);

    let (base_salary, proportional_base, absence_discount, overtime_payment) =
        match employee_type.payment_type {
            PaymentType::Fixed => {
                let base = employee_type.base_salary();
                let daily = ratio(base.to_decimal(), Decimal::from(total_laborable));
                let hourly = ratio(daily, employee_type.shift_hours());
                (
                    base,
                    daily * Decimal::from(days_elapsed),
                    daily * Decimal::from(t.absent),
                    hourly * overtime_rate * extra_hours,
                )
            }
            PaymentType::Hourly => {
                let rate = employee_type.hourly_rate();
                let hourly = rate.to_decimal();
                (
                    rate,
                    hourly * hours(t.worked_minutes),
                    Decimal::ZERO,
                    hourly * overtime_rate * extra_hours,
                )
            }
        };

    let gross = proportional_base - absence_discount + overtime_payment;
    let gross_total = Money::from_decimal(gross);
    let afp_discount = Money::from_decimal(gross * input.settings.afp.fraction());
    let essalud_contribution = Money::from_decimal(gross * input.settings.essalud.fraction());
    let mut net_total = gross_total - afp_discount;

    let bonuses = if t.absent == 0 && employee_type.has_punctuality_bonus {
        employee_type.punctuality_bonus()
    } else {
        Money::zero()
    };

    net_total += bonuses;

    Ok(PayrollComputation {
        start: period.start,
        end: period.end,
        base_salary,
        laborable_days: total_laborable,
        days_elapsed,
        days_present: t.present,
        days_absent: t.absent,
        days_justified: t.justified,
        worked_minutes: t.worked_minutes,
        overtime_minutes: t.overtime_minutes,
        overtime_payment: Money::from_decimal(overtime_payment),
        absence_discount: Money::from_decimal(absence_discount),
        proportional_base: Money::from_decimal(proportional_base),
        bonuses,
        gross_total: gross_total + bonuses,
        afp_discount,
        essalud_contribution,
        net_total,
    })
}

impl PayrollComputation {
    /// Line items stored with the payroll.
    ///
    /// Overtime, absence discount and AFP are always present; the
    /// punctuality bonus only when it is positive.
    pub fn detail_lines(&self) -> Vec<DetailLine> {
        let mut lines = vec![
            DetailLine {
                concept: CONCEPT_OVERTIME.to_string(),
                amount: self.overtime_payment,
                kind: DetailKind::Income,
            },
            DetailLine {
                concept: CONCEPT_ABSENCE.to_string(),
                amount: self.absence_discount,
                kind: DetailKind::Deduction,
            },
            DetailLine {
                concept: CONCEPT_AFP.to_string(),
                amount: self.afp_discount,
                kind: DetailKind::Deduction,
            },
        ];

        if self.bonuses.is_positive() {
            lines.push(DetailLine {
                concept: CONCEPT_PUNCTUALITY.to_string(),
                amount: self.bonuses,
                kind: DetailKind::Income,
            });
        }

        lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{NaiveTime, TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn fixed_type(base_cents: i64) -> EmployeeType {
        EmployeeType {
            id: "type-fixed".into(),
            name: "Cocinero".into(),
            payment_type: PaymentType::Fixed,
            base_salary_cents: Some(base_cents),
            hourly_rate_cents: None,
            shift_minutes: 480,
            overtime_rate_bps: 15_000,
            has_punctuality_bonus: false,
            punctuality_bonus_cents: None,
            active: true,
        }
    }

    fn hourly_type(rate_cents: i64) -> EmployeeType {
        EmployeeType {
            id: "type-hourly".into(),
            name: "Ayudante".into(),
            payment_type: PaymentType::Hourly,
            base_salary_cents: None,
            hourly_rate_cents: Some(rate_cents),
            shift_minutes: 480,
            overtime_rate_bps: 15_000,
            has_punctuality_bonus: false,
            punctuality_bonus_cents: None,
            active: true,
        }
    }

    fn no_day_offs() -> PayrollSettings {
        PayrollSettings {
            day_offs: HashSet::new(),
            ..PayrollSettings::default()
        }
    }

    fn record(day: NaiveDate, status: AttendanceStatus, shift: Option<(NaiveTime, NaiveTime)>) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("att-{}", day),
            employee_id: "emp-1".into(),
            work_date: day,
            check_in: shift.map(|s| s.0),
            check_out: shift.map(|s| s.1),
            status,
            justification: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn period(start: NaiveDate, end: NaiveDate) -> PayrollPeriod {
        PayrollPeriod { start, end, reuse: None }
    }

    fn payroll(start: NaiveDate, end: NaiveDate, paid: bool) -> Payroll {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Payroll {
            id: "pay-1".into(),
            employee_id: "emp-1".into(),
            start_date: start,
            end_date: end,
            base_salary_cents: 0,
            laborable_days: 0,
            days_present: 0,
            days_absent: 0,
            days_justified: 0,
            worked_minutes: 0,
            overtime_minutes: 0,
            overtime_payment_cents: 0,
            bonuses_cents: 0,
            absence_discount_cents: 0,
            proportional_base_cents: 0,
            gross_total_cents: 0,
            afp_discount_cents: 0,
            essalud_contribution_cents: 0,
            net_total_cents: 0,
            paid,
            created_at: now,
            updated_at: now,
        }
    }

    /// April 2025: 30 laborable days with no day-offs; window ends on the 28th.
    /// 26 full shifts, 1 absence, 1 justified day.
    fn april_attendance() -> Vec<AttendanceRecord> {
        let mut records: Vec<_> = (1..=26)
            .map(|d| record(date(2025, 4, d), AttendanceStatus::Present, Some((time(9, 0), time(17, 0)))))
            .collect();
        records.push(record(date(2025, 4, 27), AttendanceStatus::Absent, None));
        records.push(record(date(2025, 4, 28), AttendanceStatus::Justified, None));
        records
    }

    #[test]
    fn test_fixed_salary_reference_case() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        let attendance = april_attendance();
        let window = period(date(2025, 4, 1), date(2025, 4, 28));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        assert_eq!(result.laborable_days, 30);
        assert_eq!(result.days_elapsed, 28);
        assert_eq!(result.days_present, 26);
        assert_eq!(result.days_absent, 1);
        assert_eq!(result.days_justified, 1);
        assert_eq!(result.proportional_base, Money::from_major(2800));
        assert_eq!(result.absence_discount, Money::from_major(100));
        assert_eq!(result.overtime_payment, Money::zero());
        assert_eq!(result.gross_total, Money::from_major(2700));
        assert_eq!(result.afp_discount, Money::from_major(324));
        assert_eq!(result.essalud_contribution, Money::from_major(243));
        assert_eq!(result.net_total, Money::from_major(2376));
        assert_eq!(result.bonuses, Money::zero());
    }

    #[test]
    fn test_no_attendance_is_rejected() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        let attendance = vec![
            record(date(2025, 4, 1), AttendanceStatus::Absent, None),
            record(date(2025, 4, 2), AttendanceStatus::Justified, None),
        ];
        let window = period(date(2025, 4, 1), date(2025, 4, 30));

        let err = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap_err();

        assert!(matches!(err, CoreError::NoAttendance { .. }));
    }

    #[test]
    fn test_attendance_outside_window_is_ignored() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        let attendance = vec![record(
            date(2025, 3, 31),
            AttendanceStatus::Present,
            Some((time(9, 0), time(17, 0))),
        )];
        let window = period(date(2025, 4, 1), date(2025, 4, 30));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        });

        assert!(matches!(result, Err(CoreError::NoAttendance { .. })));
    }

    #[test]
    fn test_overtime_counts_excess_per_day() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        // 10 h and 7 h days: only the first contributes 2 h of overtime.
        let attendance = vec![
            record(date(2025, 4, 1), AttendanceStatus::Present, Some((time(8, 0), time(18, 0)))),
            record(date(2025, 4, 2), AttendanceStatus::Late, Some((time(10, 0), time(17, 0)))),
        ];
        let window = period(date(2025, 4, 1), date(2025, 4, 2));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        assert_eq!(result.worked_minutes, 17 * 60);
        assert_eq!(result.overtime_minutes, 120);
        // daily 100, hourly 12.50, × 1.5 × 2 h = 37.50
        assert_eq!(result.overtime_payment, Money::from_cents(3_750));
        assert_eq!(result.proportional_base, Money::from_major(200));
        assert_eq!(result.gross_total, Money::from_cents(23_750));
    }

    #[test]
    fn test_hourly_scheme() {
        let employee_type = hourly_type(1_000); // S/ 10.00 per hour
        let settings = no_day_offs();
        let attendance = vec![
            record(date(2025, 4, 1), AttendanceStatus::Present, Some((time(8, 0), time(17, 0)))),
            record(date(2025, 4, 2), AttendanceStatus::Present, Some((time(9, 0), time(13, 30)))),
            record(date(2025, 4, 3), AttendanceStatus::Absent, None),
        ];
        let window = period(date(2025, 4, 1), date(2025, 4, 3));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        // 13.5 h worked, 1 h over shift
        assert_eq!(result.base_salary, Money::from_major(10));
        assert_eq!(result.proportional_base, Money::from_major(135));
        assert_eq!(result.overtime_payment, Money::from_major(15));
        assert_eq!(result.absence_discount, Money::zero());
        assert_eq!(result.gross_total, Money::from_major(150));
        assert_eq!(result.afp_discount, Money::from_major(18));
        assert_eq!(result.net_total, Money::from_major(132));
    }

    #[test]
    fn test_net_is_rounded_gross_minus_rounded_afp() {
        let employee_type = hourly_type(1_001); // S/ 10.01 per hour
        let settings = no_day_offs();
        let attendance = vec![record(
            date(2025, 4, 1),
            AttendanceStatus::Present,
            Some((time(9, 0), time(9, 30))),
        )];
        let window = period(date(2025, 4, 1), date(2025, 4, 1));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        // gross 5.005 → 5.01, AFP 0.6006 → 0.60; round(5.005 × 0.88) would give 4.40
        assert_eq!(result.gross_total, Money::from_cents(501));
        assert_eq!(result.afp_discount, Money::from_cents(60));
        assert_eq!(result.net_total, Money::from_cents(441));
        assert_eq!(result.net_total + result.afp_discount, result.gross_total);
    }

    #[test]
    fn test_punctuality_bonus_requires_zero_absences() {
        let mut employee_type = fixed_type(300_000);
        employee_type.has_punctuality_bonus = true;
        employee_type.punctuality_bonus_cents = Some(15_000);
        let settings = no_day_offs();
        let window = period(date(2025, 4, 1), date(2025, 4, 2));

        let perfect = vec![
            record(date(2025, 4, 1), AttendanceStatus::Present, Some((time(9, 0), time(17, 0)))),
            record(date(2025, 4, 2), AttendanceStatus::Justified, None),
        ];
        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &perfect,
            period: &window,
        })
        .unwrap();

        // base 200, AFP 24, then bonus 150 on both gross and net
        assert_eq!(result.bonuses, Money::from_major(150));
        assert_eq!(result.gross_total, Money::from_major(350));
        assert_eq!(result.afp_discount, Money::from_major(24));
        assert_eq!(result.net_total, Money::from_major(326));
        assert_eq!(result.detail_lines().len(), 4);

        let with_absence = vec![
            record(date(2025, 4, 1), AttendanceStatus::Present, Some((time(9, 0), time(17, 0)))),
            record(date(2025, 4, 2), AttendanceStatus::Absent, None),
        ];
        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &with_absence,
            period: &window,
        })
        .unwrap();

        assert_eq!(result.bonuses, Money::zero());
        assert_eq!(result.detail_lines().len(), 3);
    }

    #[test]
    fn test_bonus_flag_without_amount_adds_nothing() {
        let mut employee_type = fixed_type(300_000);
        employee_type.has_punctuality_bonus = true;
        let settings = no_day_offs();
        let attendance = vec![record(
            date(2025, 4, 1),
            AttendanceStatus::Present,
            Some((time(9, 0), time(17, 0))),
        )];
        let window = period(date(2025, 4, 1), date(2025, 4, 1));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        assert!(result.bonuses.is_zero());
        assert_eq!(result.detail_lines().len(), 3);
    }

    #[test]
    fn test_zero_shift_length_yields_zero_overtime_pay() {
        let mut employee_type = fixed_type(300_000);
        employee_type.shift_minutes = 0;
        let settings = no_day_offs();
        let attendance = vec![record(
            date(2025, 4, 1),
            AttendanceStatus::Present,
            Some((time(9, 0), time(17, 0))),
        )];
        let window = period(date(2025, 4, 1), date(2025, 4, 1));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        assert_eq!(result.overtime_minutes, 480);
        assert!(result.overtime_payment.is_zero());
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let employee_type = fixed_type(250_000);
        let settings = PayrollSettings::default();
        let attendance = april_attendance();
        let window = period(date(2025, 4, 1), date(2025, 4, 28));
        let input = PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        };

        let first = compute(input).unwrap();
        let second = compute(input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.detail_lines(), second.detail_lines());
    }

    #[test]
    fn test_detail_lines_kinds() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        let attendance = april_attendance();
        let window = period(date(2025, 4, 1), date(2025, 4, 28));

        let lines = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &[],
            attendance: &attendance,
            period: &window,
        })
        .unwrap()
        .detail_lines();

        assert_eq!(lines[0].concept, CONCEPT_OVERTIME);
        assert_eq!(lines[0].kind, DetailKind::Income);
        assert_eq!(lines[1].amount, Money::from_major(100));
        assert_eq!(lines[1].kind, DetailKind::Deduction);
        assert_eq!(lines[2].concept, CONCEPT_AFP);
        assert_eq!(lines[2].amount, Money::from_major(324));
    }

    #[test]
    fn test_resolve_period_first_payroll() {
        let p = resolve_period(None, 2025, 4, date(2025, 4, 18)).unwrap();
        assert_eq!(p, period(date(2025, 4, 1), date(2025, 4, 18)));

        let p = resolve_period(None, 2025, 3, date(2025, 4, 18)).unwrap();
        assert_eq!(p, period(date(2025, 3, 1), date(2025, 3, 31)));
    }

    #[test]
    fn test_resolve_period_after_paid_payroll() {
        let prior = payroll(date(2025, 3, 1), date(2025, 3, 15), true);
        let p = resolve_period(Some(&prior), 2025, 3, date(2025, 4, 18)).unwrap();
        assert_eq!(p, period(date(2025, 3, 16), date(2025, 3, 31)));
    }

    #[test]
    fn test_resolve_period_reuses_unpaid_payroll() {
        let prior = payroll(date(2025, 4, 1), date(2025, 4, 30), false);
        let p = resolve_period(Some(&prior), 2025, 5, date(2025, 4, 18)).unwrap();
        assert_eq!(p.start, date(2025, 4, 1));
        assert_eq!(p.end, date(2025, 4, 18));
        assert_eq!(p.reuse.as_deref(), Some("pay-1"));
    }

    #[test]
    fn test_resolve_period_rejects_bad_month() {
        assert!(resolve_period(None, 2025, 0, date(2025, 4, 18)).is_err());
    }

    #[test]
    fn test_holidays_shrink_laborable_days() {
        let employee_type = fixed_type(300_000);
        let settings = no_day_offs();
        let holidays = vec![Holiday {
            id: "h1".into(),
            name: "Labour Day".into(),
            date: date(2025, 5, 1),
            is_recurring: false,
        }];
        let attendance = vec![record(
            date(2025, 5, 2),
            AttendanceStatus::Present,
            Some((time(9, 0), time(17, 0))),
        )];
        let window = period(date(2025, 5, 1), date(2025, 5, 2));

        let result = compute(PayrollInput {
            employee_id: "emp-1",
            employee_type: &employee_type,
            settings: &settings,
            holidays: &holidays,
            attendance: &attendance,
            period: &window,
        })
        .unwrap();

        assert_eq!(result.laborable_days, 30);
        assert_eq!(result.days_elapsed, 1);
        assert_eq!(result.proportional_base, Money::from_major(100));
    }
}
