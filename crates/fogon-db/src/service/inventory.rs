//! # Inventory Service
//!
//! Order-line state changes, FIFO stock depletion and stock receipts.
//!
//! ## Completing a product line
//! ```text
//! update_line_state(line, completed, user)
//!     │  BEGIN
//!     ▼
//! load line → plan_transition(item, from, to)
//!     │  InvalidTransition ──► rollback
//!     ▼
//! DepleteStock (product tracks inventory)
//!     │  lock lots (first write takes SQLite's write lock)
//!     │  load lots oldest first → fifo::deplete
//!     │  InsufficientStock ──► rollback, line keeps its state
//!     ▼
//! lot quantities, one outbound row + kardex entry per unit, line state
//!     │  COMMIT
//!     ▼
//! StateChange { line, ledger }
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::inventory::InventoryRepository;
use crate::repository::new_id;
use crate::repository::order::OrderRepository;
use fogon_core::fifo;
use fogon_core::order::{plan_transition, TransitionEffect};
use fogon_core::validation::{validate_name, validate_price_cents, validate_quantity};
use fogon_core::{CoreError, InventoryLot, KardexEntry, MovementType, OrderLine, OrderLineState};

/// Result of an order-line state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChange {
    pub line: OrderLine,
    /// Kardex entries written by the change; empty unless stock was taken.
    pub ledger: Vec<KardexEntry>,
}

/// A stock receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveStock {
    pub product_id: String,
    pub user_id: String,
    pub quantity: i64,
    pub batch: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub unit_price_cents: Option<i64>,
}

/// Stock level of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: String,
    pub on_hand: i64,
    pub lots: Vec<InventoryLot>,
}

/// Inventory and order-line operations.
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// Moves an order line to `to`, applying the transition's side effect.
    ///
    /// Everything happens in one transaction. On any error the line keeps
    /// its current state and no stock moves.
    pub async fn update_line_state(
        &self,
        line_id: &str,
        to: OrderLineState,
        user_id: &str,
    ) -> DbResult<StateChange> {
        let mut tx = self.db.pool().begin().await?;

        let line = OrderRepository::find_line_in(&mut *tx, line_id)
            .await?
            .ok_or_else(|| CoreError::OrderLineNotFound(line_id.to_string()))?;

        let effect = plan_transition(&line.item, line.quantity, line.state, to)?;
        debug!(line_id = %line_id, from = %line.state, to = %to, ?effect, "Order line transition");

        let mut ledger = Vec::new();
        match effect {
            TransitionEffect::None => {}
            TransitionEffect::RestockDish { dish_id, quantity } => {
                OrderRepository::adjust_dish_quantity_in(&mut *tx, &dish_id, quantity).await?;
                info!(dish_id = %dish_id, quantity, "Portions returned to dish");
            }
            TransitionEffect::DepleteStock { product_id, quantity } => {
                let product = InventoryRepository::find_product_in(&mut *tx, &product_id)
                    .await?
                    .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;

                if product.track_inventory {
                    ledger = Self::deplete_in(&mut *tx, &product_id, quantity, user_id).await?;
                } else {
                    debug!(product_id = %product_id, "Product does not track inventory");
                }
            }
        }

        OrderRepository::set_state_in(&mut *tx, line_id, to).await?;
        tx.commit().await?;

        info!(line_id = %line_id, from = %line.state, to = %to, units = ledger.len(), "Order line updated");

        Ok(StateChange {
            line: OrderLine { state: to, ..line },
            ledger,
        })
    }

    /// Takes `quantity` units of a product, oldest lots first.
    ///
    /// Returns one kardex entry per unit.
    pub async fn deplete_stock(&self, product_id: &str, quantity: i64, user_id: &str) -> DbResult<Vec<KardexEntry>> {
        let mut tx = self.db.pool().begin().await?;

        InventoryRepository::find_product_in(&mut *tx, product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        let ledger = Self::deplete_in(&mut *tx, product_id, quantity, user_id).await?;

        tx.commit().await?;
        Ok(ledger)
    }

    /// FIFO depletion on the caller's transaction.
    async fn deplete_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
        user_id: &str,
    ) -> DbResult<Vec<KardexEntry>> {
        InventoryRepository::lock_lots_in(&mut *conn, product_id).await?;
        let lots = InventoryRepository::lots_in(&mut *conn, product_id).await?;

        let depletion = fifo::deplete(product_id, &lots, quantity)?;

        for lot in &depletion.updated_lots {
            InventoryRepository::set_lot_quantity_in(&mut *conn, &lot.id, lot.quantity).await?;
        }

        let now = Utc::now();
        let mut ledger = Vec::with_capacity(depletion.units.len());
        for unit in &depletion.units {
            let detail_id = InventoryRepository::insert_outbound_unit_in(&mut *conn, product_id, unit, now).await?;
            let entry = KardexEntry {
                id: new_id(),
                user_id: user_id.to_string(),
                product_id: Some(product_id.to_string()),
                input_id: None,
                movement_id: None,
                detail_id: Some(detail_id),
                movement_type: MovementType::Outbound,
                total_price_cents: unit.unit_price_cents,
                created_at: now,
            };
            InventoryRepository::insert_kardex_in(&mut *conn, &entry).await?;
            ledger.push(entry);
        }

        info!(
            product_id = %product_id,
            quantity,
            lots_touched = depletion.updated_lots.len(),
            "Stock depleted"
        );
        Ok(ledger)
    }

    /// Receives a batch of stock as a new lot.
    ///
    /// Writes the movement, the lot and one inbound kardex entry together.
    pub async fn receive_stock(&self, receipt: ReceiveStock) -> DbResult<InventoryLot> {
        validate_quantity(receipt.quantity)?;
        validate_name("user_id", &receipt.user_id)?;
        if let Some(price) = receipt.unit_price_cents {
            validate_price_cents(price)?;
        }

        let mut tx = self.db.pool().begin().await?;

        InventoryRepository::find_product_in(&mut *tx, &receipt.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(receipt.product_id.clone()))?;

        let now = Utc::now();
        let movement_id = InventoryRepository::insert_movement_in(
            &mut *tx,
            &receipt.product_id,
            &receipt.user_id,
            MovementType::Inbound,
            now,
        )
        .await?;

        let lot = InventoryLot {
            id: new_id(),
            product_id: receipt.product_id.clone(),
            movement_id: Some(movement_id.clone()),
            quantity: receipt.quantity,
            batch: receipt.batch.filter(|b| !b.trim().is_empty()),
            expiration_date: receipt.expiration_date,
            unit_price_cents: receipt.unit_price_cents,
            created_at: now,
        };
        InventoryRepository::insert_lot_in(&mut *tx, &lot).await?;

        let entry = KardexEntry {
            id: new_id(),
            user_id: receipt.user_id,
            product_id: Some(lot.product_id.clone()),
            input_id: None,
            movement_id: Some(movement_id),
            detail_id: Some(lot.id.clone()),
            movement_type: MovementType::Inbound,
            total_price_cents: lot.unit_price_cents.map(|p| p * lot.quantity),
            created_at: now,
        };
        InventoryRepository::insert_kardex_in(&mut *tx, &entry).await?;

        tx.commit().await?;

        info!(product_id = %lot.product_id, lot_id = %lot.id, quantity = lot.quantity, "Stock received");
        Ok(lot)
    }

    /// Units on hand and the lots holding them.
    pub async fn stock_level(&self, product_id: &str) -> DbResult<StockLevel> {
        let inventory = self.db.inventory();
        inventory
            .get_product(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        Ok(StockLevel {
            product_id: product_id.to_string(),
            on_hand: inventory.stock_on_hand(product_id).await?,
            lots: inventory.lots(product_id).await?,
        })
    }

    /// Kardex of a product, newest first.
    pub async fn kardex(&self, product_id: &str) -> DbResult<Vec<KardexEntry>> {
        self.db.inventory().kardex(product_id).await
    }
}
