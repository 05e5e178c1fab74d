//! # FIFO Depletion
//!
//! Walks a product's lots oldest-first and takes units until the requested
//! quantity is covered.
//!
//! ```text
//! lots (oldest first)       deplete 4
//! ┌──────────┬──────────┐
//! │ A: 3 @t1 │ B: 5 @t2 │   take 3 from A, 1 from B
//! └──────────┴──────────┘
//!        ▼                  units: A, A, A, B
//! ┌──────────┬──────────┐
//! │ A: 0     │ B: 4     │
//! └──────────┴──────────┘
//! ```
//!
//! The function never touches storage; the caller persists the result in
//! one transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::InventoryLot;

/// One unit taken from a lot; becomes one outbound ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepletedUnit {
    pub source_lot_id: String,
    pub batch: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub unit_price_cents: Option<i64>,
}

/// Outcome of a depletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depletion {
    /// Lots that were touched, with their new remaining quantity.
    pub updated_lots: Vec<InventoryLot>,
    /// One entry per unit, in consumption order.
    pub units: Vec<DepletedUnit>,
}

/// Sum of remaining units across lots.
pub fn available(lots: &[InventoryLot]) -> i64 {
    lots.iter().map(|l| l.quantity.max(0)).sum()
}

/// Sorts lots into FIFO order by `created_at`.
///
/// Stable: lots received at the same instant keep the given order.
pub fn sort_fifo(lots: &mut [InventoryLot]) {
    lots.sort_by_key(|l| l.created_at);
}

/// Takes `quantity` units from `lots`, oldest first.
///
/// ## Errors
/// - `quantity <= 0` → `MustBePositive`
/// - fewer units than requested → `InsufficientStock`, nothing is taken
pub fn deplete(product_id: &str, lots: &[InventoryLot], quantity: i64) -> CoreResult<Depletion> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    let total = available(lots);
    if total < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available: total,
            requested: quantity,
        });
    }

    let mut ordered: Vec<InventoryLot> = lots.iter().filter(|l| l.quantity > 0).cloned().collect();
    sort_fifo(&mut ordered);

    let mut remaining = quantity;
    let mut updated_lots = Vec::new();
    let mut units = Vec::with_capacity(quantity as usize);

    for mut lot in ordered {
        if remaining == 0 {
            break;
        }

        let take = lot.quantity.min(remaining);
        units.extend((0..take).map(|_| DepletedUnit {
            source_lot_id: lot.id.clone(),
            batch: lot.batch.clone(),
            expiration_date: lot.expiration_date,
            unit_price_cents: lot.unit_price_cents,
        }));

        lot.quantity -= take;
        remaining -= take;
        updated_lots.push(lot);
    }

    Ok(Depletion { updated_lots, units })
}
