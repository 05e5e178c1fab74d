//! # Order Repository
//!
//! Orders, order lines and dish portions.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use fogon_core::validation::{validate_name, validate_quantity};
use fogon_core::{CoreResult, Dish, OrderItem, OrderLine, OrderLineState};

/// Raw `order_lines` row; the item columns are folded into [`OrderItem`].
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: String,
    order_id: String,
    dish_id: Option<String>,
    product_id: Option<String>,
    quantity: i64,
    state: OrderLineState,
    created_at: DateTime<Utc>,
}

impl OrderLineRow {
    fn into_line(self) -> CoreResult<OrderLine> {
        Ok(OrderLine {
            id: self.id,
            order_id: self.order_id,
            item: OrderItem::from_columns(self.dish_id, self.product_id)?,
            quantity: self.quantity,
            state: self.state,
            created_at: self.created_at,
        })
    }
}

/// Repository for orders and dishes.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Opens an empty order and returns its ID.
    pub async fn create_order(&self) -> DbResult<String> {
        let id = new_id();
        sqlx::query("INSERT INTO orders (id, created_at) VALUES (?1, ?2)")
            .bind(&id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        debug!(id = %id, "Created order");
        Ok(id)
    }

    /// Adds a pending line to an order.
    pub async fn add_line(&self, order_id: &str, item: OrderItem, quantity: i64) -> DbResult<OrderLine> {
        validate_quantity(quantity)?;

        let line = OrderLine {
            id: new_id(),
            order_id: order_id.to_string(),
            item,
            quantity,
            state: OrderLineState::Pending,
            created_at: Utc::now(),
        };
        let (dish_id, product_id) = line.item.to_columns();

        sqlx::query(
            "INSERT INTO order_lines (id, order_id, dish_id, product_id, quantity, state, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(dish_id)
        .bind(product_id)
        .bind(line.quantity)
        .bind(line.state)
        .bind(line.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %line.id, order_id = %order_id, quantity, "Added order line");
        Ok(line)
    }

    /// Gets an order line by ID.
    pub async fn get_line(&self, id: &str) -> DbResult<Option<OrderLine>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_line_in(&mut conn, id).await
    }

    /// Creates a dish with `quantity` portions.
    pub async fn insert_dish(&self, name: &str, quantity: i64) -> DbResult<Dish> {
        validate_name("name", name)?;

        let dish = Dish {
            id: new_id(),
            name: name.trim().to_string(),
            quantity,
        };

        sqlx::query("INSERT INTO dishes (id, name, quantity) VALUES (?1, ?2, ?3)")
            .bind(&dish.id)
            .bind(&dish.name)
            .bind(dish.quantity)
            .execute(&self.pool)
            .await?;

        Ok(dish)
    }

    /// Gets a dish by ID.
    pub async fn get_dish(&self, id: &str) -> DbResult<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>("SELECT id, name, quantity FROM dishes WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dish)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped
    // -------------------------------------------------------------------------

    /// Loads an order line on the caller's connection.
    pub async fn find_line_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<OrderLine>> {
        let row = sqlx::query_as::<_, OrderLineRow>(
            "SELECT id, order_id, dish_id, product_id, quantity, state, created_at \
             FROM order_lines WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into_line()?)),
            None => Ok(None),
        }
    }

    /// Sets the state of an order line.
    pub async fn set_state_in(conn: &mut SqliteConnection, id: &str, state: OrderLineState) -> DbResult<()> {
        let result = sqlx::query("UPDATE order_lines SET state = ?2 WHERE id = ?1")
            .bind(id)
            .bind(state)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("OrderLine", id));
        }
        Ok(())
    }

    /// Adds `delta` portions to a dish (negative to take them).
    pub async fn adjust_dish_quantity_in(conn: &mut SqliteConnection, dish_id: &str, delta: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE dishes SET quantity = quantity + ?2 WHERE id = ?1")
            .bind(dish_id)
            .bind(delta)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Dish", dish_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_line_roundtrip_keeps_item_kind() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dish = db.orders().insert_dish("Lomo saltado", 10).await.unwrap();
        let product = db.inventory().insert_product("Inca Kola", true).await.unwrap();
        let order_id = db.orders().create_order().await.unwrap();

        let dish_line = db
            .orders()
            .add_line(&order_id, OrderItem::Dish(dish.id.clone()), 2)
            .await
            .unwrap();
        let product_line = db
            .orders()
            .add_line(&order_id, OrderItem::Product(product.id.clone()), 1)
            .await
            .unwrap();

        let loaded = db.orders().get_line(&dish_line.id).await.unwrap().unwrap();
        assert_eq!(loaded.item, OrderItem::Dish(dish.id));
        assert_eq!(loaded.state, OrderLineState::Pending);

        let loaded = db.orders().get_line(&product_line.id).await.unwrap().unwrap();
        assert_eq!(loaded.item, OrderItem::Product(product.id));
    }

    #[tokio::test]
    async fn test_zero_quantity_line_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dish = db.orders().insert_dish("Ceviche", 5).await.unwrap();
        let order_id = db.orders().create_order().await.unwrap();

        assert!(db.orders().add_line(&order_id, OrderItem::Dish(dish.id), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_set_state_and_adjust_dish() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dish = db.orders().insert_dish("Ají de gallina", 4).await.unwrap();
        let order_id = db.orders().create_order().await.unwrap();
        let line = db
            .orders()
            .add_line(&order_id, OrderItem::Dish(dish.id.clone()), 2)
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        OrderRepository::set_state_in(&mut conn, &line.id, OrderLineState::InPreparation)
            .await
            .unwrap();
        OrderRepository::adjust_dish_quantity_in(&mut conn, &dish.id, 2).await.unwrap();
        drop(conn);

        let line = db.orders().get_line(&line.id).await.unwrap().unwrap();
        assert_eq!(line.state, OrderLineState::InPreparation);
        assert_eq!(db.orders().get_dish(&dish.id).await.unwrap().unwrap().quantity, 6);
    }

    #[tokio::test]
    async fn test_unknown_line_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.orders().get_line("missing").await.unwrap().is_none());

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(OrderRepository::set_state_in(&mut conn, "missing", OrderLineState::Completed)
            .await
            .is_err());
    }
}
