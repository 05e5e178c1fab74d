//! # Inventory Repository
//!
//! Products, stock lots and the kardex ledger.
//!
//! ## Storage Layout
//! ```text
//! movements            one row per stock receipt
//!     │
//!     ▼
//! movement_details     movement_type = 0  → a lot (quantity = remaining)
//!                      movement_type = 1  → one consumed unit, source_lot_id set
//!     │ 1:1
//!     ▼
//! kardex_entries       append-only ledger, one per detail row
//! ```
//!
//! Depletion itself lives in [`InventoryService`](crate::service::inventory::InventoryService);
//! this module only reads and writes rows.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use fogon_core::fifo::DepletedUnit;
use fogon_core::validation::validate_name;
use fogon_core::{InventoryLot, KardexEntry, MovementType, Product};

const LOT_COLUMNS: &str =
    "id, product_id, movement_id, quantity, batch, expiration_date, unit_price_cents, created_at";

const KARDEX_COLUMNS: &str = "id, user_id, product_id, input_id, movement_id, detail_id, \
     movement_type, total_price_cents, created_at";

/// Repository for products, lots and kardex.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Creates a product.
    pub async fn insert_product(&self, name: &str, track_inventory: bool) -> DbResult<Product> {
        validate_name("name", name)?;

        let product = Product {
            id: new_id(),
            name: name.trim().to_string(),
            track_inventory,
            active: true,
        };

        sqlx::query("INSERT INTO products (id, name, track_inventory, active) VALUES (?1, ?2, ?3, ?4)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.track_inventory)
            .bind(product.active)
            .execute(&self.pool)
            .await?;

        debug!(id = %product.id, name = %product.name, track_inventory, "Created product");
        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_product_in(&mut conn, id).await
    }

    /// Sum of remaining units across the product's lots.
    pub async fn stock_on_hand(&self, product_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM movement_details \
             WHERE product_id = ?1 AND movement_type = 0",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Lots that still hold stock, oldest first.
    pub async fn lots(&self, product_id: &str) -> DbResult<Vec<InventoryLot>> {
        let mut conn = self.pool.acquire().await?;
        Self::lots_in(&mut conn, product_id).await
    }

    /// Kardex entries of a product, newest first.
    pub async fn kardex(&self, product_id: &str) -> DbResult<Vec<KardexEntry>> {
        let sql = format!(
            "SELECT {KARDEX_COLUMNS} FROM kardex_entries WHERE product_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        );
        let entries = sqlx::query_as::<_, KardexEntry>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    /// Outbound unit rows taken from a lot.
    pub async fn units_from_lot(&self, lot_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM movement_details WHERE source_lot_id = ?1 AND movement_type = 1",
        )
        .bind(lot_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Loads a product on the caller's connection.
    pub async fn find_product_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, track_inventory, active FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(product)
    }

    /// Takes SQLite's write lock for the rest of the transaction.
    ///
    /// A deferred transaction only locks on its first write; touching the
    /// product's lots up front keeps a concurrent depletion from reading the
    /// same quantities.
    pub async fn lock_lots_in(conn: &mut SqliteConnection, product_id: &str) -> DbResult<()> {
        sqlx::query(
            "UPDATE movement_details SET quantity = quantity \
             WHERE product_id = ?1 AND movement_type = 0",
        )
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Lots with remaining stock, by receipt time then insertion order.
    pub async fn lots_in(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Vec<InventoryLot>> {
        let sql = format!(
            "SELECT {LOT_COLUMNS} FROM movement_details \
             WHERE product_id = ?1 AND movement_type = 0 AND quantity > 0 \
             ORDER BY created_at, rowid"
        );
        let lots = sqlx::query_as::<_, InventoryLot>(&sql)
            .bind(product_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(lots)
    }

    /// Sets a lot's remaining quantity.
    pub async fn set_lot_quantity_in(conn: &mut SqliteConnection, lot_id: &str, quantity: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE movement_details SET quantity = ?2 WHERE id = ?1 AND movement_type = 0",
        )
        .bind(lot_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Lot", lot_id));
        }
        Ok(())
    }

    /// Inserts a stock movement header and returns its ID.
    pub async fn insert_movement_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        user_id: &str,
        movement_type: MovementType,
        created_at: DateTime<Utc>,
    ) -> DbResult<String> {
        let id = new_id();
        sqlx::query(
            "INSERT INTO movements (id, product_id, user_id, movement_type, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(product_id)
        .bind(user_id)
        .bind(movement_type)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Inserts an inbound lot.
    pub async fn insert_lot_in(conn: &mut SqliteConnection, lot: &InventoryLot) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO movement_details (
                id, movement_id, product_id, movement_type, quantity,
                batch, expiration_date, unit_price_cents, source_lot_id, created_at
            ) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, NULL, ?8)
            "#,
        )
        .bind(&lot.id)
        .bind(&lot.movement_id)
        .bind(&lot.product_id)
        .bind(lot.quantity)
        .bind(&lot.batch)
        .bind(lot.expiration_date)
        .bind(lot.unit_price_cents)
        .bind(lot.created_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Inserts the audit row for one consumed unit and returns its ID.
    pub async fn insert_outbound_unit_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        unit: &DepletedUnit,
        created_at: DateTime<Utc>,
    ) -> DbResult<String> {
        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO movement_details (
                id, movement_id, product_id, movement_type, quantity,
                batch, expiration_date, unit_price_cents, source_lot_id, created_at
            ) VALUES (?1, NULL, ?2, 1, 1, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(product_id)
        .bind(&unit.batch)
        .bind(unit.expiration_date)
        .bind(unit.unit_price_cents)
        .bind(&unit.source_lot_id)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Appends a kardex entry.
    pub async fn insert_kardex_in(conn: &mut SqliteConnection, entry: &KardexEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kardex_entries (
                id, user_id, product_id, input_id, movement_id, detail_id,
                movement_type, total_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.product_id)
        .bind(&entry.input_id)
        .bind(&entry.movement_id)
        .bind(&entry.detail_id)
        .bind(entry.movement_type)
        .bind(entry.total_price_cents)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::{Database, DbConfig};

    fn lot(product_id: &str, quantity: i64, batch: &str, created_at: DateTime<Utc>) -> InventoryLot {
        InventoryLot {
            id: new_id(),
            product_id: product_id.to_string(),
            movement_id: None,
            quantity,
            batch: Some(batch.to_string()),
            expiration_date: NaiveDate::from_ymd_opt(2026, 1, 31),
            unit_price_cents: Some(350),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_product_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.inventory().insert_product("Inca Kola 500ml", true).await.unwrap();

        let loaded = db.inventory().get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Inca Kola 500ml");
        assert!(loaded.track_inventory);
        assert!(db.inventory().get_product("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lots_oldest_first_and_stock_on_hand() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.inventory().insert_product("Chicha", true).await.unwrap();
        let t1 = Utc::now();

        let mut conn = db.pool().acquire().await.unwrap();
        let newer = lot(&product.id, 5, "B", t1 + Duration::minutes(5));
        let older = lot(&product.id, 3, "A", t1);
        let empty = lot(&product.id, 0, "C", t1 - Duration::minutes(5));
        InventoryRepository::insert_lot_in(&mut conn, &newer).await.unwrap();
        InventoryRepository::insert_lot_in(&mut conn, &older).await.unwrap();
        InventoryRepository::insert_lot_in(&mut conn, &empty).await.unwrap();
        drop(conn);

        let lots = db.inventory().lots(&product.id).await.unwrap();
        let batches: Vec<_> = lots.iter().filter_map(|l| l.batch.as_deref()).collect();
        assert_eq!(batches, vec!["A", "B"]);
        assert_eq!(db.inventory().stock_on_hand(&product.id).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_same_instant_lots_keep_insertion_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.inventory().insert_product("Chicha", true).await.unwrap();
        let t = Utc::now();

        let mut conn = db.pool().acquire().await.unwrap();
        for batch in ["first", "second", "third"] {
            InventoryRepository::insert_lot_in(&mut conn, &lot(&product.id, 1, batch, t))
                .await
                .unwrap();
        }
        let lots = InventoryRepository::lots_in(&mut conn, &product.id).await.unwrap();
        let batches: Vec<_> = lots.iter().filter_map(|l| l.batch.as_deref()).collect();
        assert_eq!(batches, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_outbound_rows_are_not_lots() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.inventory().insert_product("Chicha", true).await.unwrap();
        let source = lot(&product.id, 2, "A", Utc::now());

        let mut conn = db.pool().acquire().await.unwrap();
        InventoryRepository::insert_lot_in(&mut conn, &source).await.unwrap();
        let unit = DepletedUnit {
            source_lot_id: source.id.clone(),
            batch: source.batch.clone(),
            expiration_date: source.expiration_date,
            unit_price_cents: source.unit_price_cents,
        };
        InventoryRepository::insert_outbound_unit_in(&mut conn, &product.id, &unit, Utc::now())
            .await
            .unwrap();
        InventoryRepository::set_lot_quantity_in(&mut conn, &source.id, 1).await.unwrap();
        drop(conn);

        assert_eq!(db.inventory().lots(&product.id).await.unwrap().len(), 1);
        assert_eq!(db.inventory().stock_on_hand(&product.id).await.unwrap(), 1);
        assert_eq!(db.inventory().units_from_lot(&source.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_quantity_of_unknown_lot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = InventoryRepository::set_lot_quantity_in(&mut conn, "nope", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
