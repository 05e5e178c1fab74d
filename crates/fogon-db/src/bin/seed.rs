//! # Seed Data Generator
//!
//! Populates a development database with a small restaurant.
//!
//! ## Usage
//! ```bash
//! cargo run -p fogon-db --bin seed
//!
//! # Specify database path
//! cargo run -p fogon-db --bin seed -- --db ./data/fogon.db
//! ```
//!
//! ## Generated Data
//! - Employee types (fixed and hourly) and one employee per type
//! - Attendance for the current month up to yesterday
//! - National holidays (recurring)
//! - Products with two stock lots each, and a few dishes
//! - One reservation later today

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use fogon_core::time::parse_time;
use fogon_core::{AttendanceStatus, EmployeeType, PaymentType};
use fogon_db::repository::attendance::NewAttendance;
use fogon_db::repository::new_id;
use fogon_db::repository::reservation::NewReservation;
use fogon_db::service::inventory::{InventoryService, ReceiveStock};
use fogon_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, payment, base or hourly rate in céntimos, punctuality bonus)
const EMPLOYEE_TYPES: &[(&str, PaymentType, i64, Option<i64>)] = &[
    ("Mesero", PaymentType::Fixed, 150_000, Some(10_000)),
    ("Cocinero", PaymentType::Fixed, 250_000, Some(15_000)),
    ("Ayudante de cocina", PaymentType::Hourly, 1_000, None),
];

const EMPLOYEES: &[(&str, &str)] = &[
    ("Lucía Quispe", "EMP-001"),
    ("Jorge Huamán", "EMP-002"),
    ("Rosa Mamani", "EMP-003"),
];

/// (name, month, day)
const HOLIDAYS: &[(&str, u32, u32)] = &[
    ("Año Nuevo", 1, 1),
    ("Día del Trabajo", 5, 1),
    ("San Pedro y San Pablo", 6, 29),
    ("Fiestas Patrias", 7, 28),
    ("Fiestas Patrias", 7, 29),
    ("Santa Rosa de Lima", 8, 30),
    ("Combate de Angamos", 10, 8),
    ("Todos los Santos", 11, 1),
    ("Inmaculada Concepción", 12, 8),
    ("Navidad", 12, 25),
];

/// (name, unit price in céntimos)
const PRODUCTS: &[(&str, i64)] = &[
    ("Inca Kola 500ml", 350),
    ("Coca-Cola 500ml", 350),
    ("Chicha morada 1L", 800),
    ("Cerveza Cusqueña", 700),
    ("Agua San Luis 625ml", 200),
];

const DISHES: &[(&str, i64)] = &[
    ("Lomo saltado", 20),
    ("Ceviche clásico", 15),
    ("Ají de gallina", 12),
    ("Arroz chaufa", 25),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./fogon_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fogón Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fogon_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding database");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.employees().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has employees; skipping seed. Delete the file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();

    seed_staff(&db, today).await?;
    seed_holidays(&db).await?;
    seed_inventory(&db).await?;
    seed_reservation(&db, today).await?;

    info!("Seed complete");
    Ok(())
}

async fn seed_staff(db: &Database, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let month_start = today.with_day(1).unwrap_or(today);
    let shift_start = parse_time("check_in", "09:00")?;
    let shift_end = parse_time("check_out", "17:30")?;

    for ((type_name, payment_type, amount, bonus), (name, code)) in EMPLOYEE_TYPES.iter().zip(EMPLOYEES) {
        let employee_type = EmployeeType {
            id: new_id(),
            name: type_name.to_string(),
            payment_type: *payment_type,
            base_salary_cents: (*payment_type == PaymentType::Fixed).then_some(*amount),
            hourly_rate_cents: (*payment_type == PaymentType::Hourly).then_some(*amount),
            shift_minutes: EmployeeType::DEFAULT_SHIFT_MINUTES,
            overtime_rate_bps: EmployeeType::DEFAULT_OVERTIME_RATE_BPS,
            has_punctuality_bonus: bonus.is_some(),
            punctuality_bonus_cents: *bonus,
            active: true,
        };
        db.employees().insert_type(&employee_type).await?;
        let employee = db.employees().create(name, code, Some(&employee_type.id)).await?;

        let mut day = month_start;
        let mut recorded = 0;
        while day < today {
            if day.weekday() != Weekday::Sun {
                // every ninth working day late, one absence mid-month
                let status = match recorded % 9 {
                    _ if day.day() == 15 => AttendanceStatus::Absent,
                    8 => AttendanceStatus::Late,
                    _ => AttendanceStatus::Present,
                };
                let timed = !status.is_timeless();
                db.attendance()
                    .register(NewAttendance {
                        employee_id: employee.id.clone(),
                        work_date: day,
                        check_in: timed.then_some(shift_start),
                        check_out: timed.then_some(shift_end),
                        status,
                        justification: None,
                    })
                    .await?;
                recorded += 1;
            }
            day += Duration::days(1);
        }

        info!(code = %code, days = recorded, "Seeded employee");
    }
    Ok(())
}

async fn seed_holidays(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for (name, month, day) in HOLIDAYS {
        if let Some(date) = NaiveDate::from_ymd_opt(2000, *month, *day) {
            db.holidays().create(name, date, true).await?;
        }
    }
    info!(count = HOLIDAYS.len(), "Seeded holidays");
    Ok(())
}

async fn seed_inventory(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let service = InventoryService::new(db.clone());

    for (name, price) in PRODUCTS {
        let product = db.inventory().insert_product(name, true).await?;
        for (batch, quantity) in [("L-001", 24), ("L-002", 48)] {
            service
                .receive_stock(ReceiveStock {
                    product_id: product.id.clone(),
                    user_id: "seed".to_string(),
                    quantity,
                    batch: Some(batch.to_string()),
                    expiration_date: None,
                    unit_price_cents: Some(*price),
                })
                .await?;
        }
    }

    for (name, portions) in DISHES {
        db.orders().insert_dish(name, *portions).await?;
    }

    info!(products = PRODUCTS.len(), dishes = DISHES.len(), "Seeded inventory");
    Ok(())
}

async fn seed_reservation(db: &Database, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let hour = parse_time("hour", "20:00")?;
    db.reservations()
        .insert(NewReservation {
            code: "RES-0001".to_string(),
            customer_name: "Carmen Rojas".to_string(),
            customer_phone: Some("987654321".to_string()),
            date: today,
            hour,
            party_size: 4,
        })
        .await?;
    info!(date = %today, "Seeded reservation");
    Ok(())
}
