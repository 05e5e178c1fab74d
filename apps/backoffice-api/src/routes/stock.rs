//! Stock receipt and stock on hand.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use fogon_core::{InventoryLot, KardexEntry};
use fogon_db::service::inventory::{ReceiveStock, StockLevel};

use super::acting_user;
use crate::dto::{MessageResponse, ReceiveStockRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /products/{id}/stock`
pub async fn receive(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ReceiveStockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<InventoryLot>>), ApiError> {
    let Json(req) = payload?;
    let user_id = acting_user(&headers)?;

    let lot = state
        .inventory
        .receive_stock(ReceiveStock {
            product_id,
            user_id,
            quantity: req.quantity,
            batch: req.batch,
            expiration_date: req.expiration_date,
            unit_price_cents: req.unit_price_cents,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Stock received", lot))))
}

/// `GET /products/{id}/stock`
pub async fn level(State(state): State<AppState>, Path(product_id): Path<String>) -> Result<Json<StockLevel>, ApiError> {
    Ok(Json(state.inventory.stock_level(&product_id).await?))
}

/// `GET /products/{id}/kardex`
pub async fn kardex(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<KardexEntry>>, ApiError> {
    Ok(Json(state.inventory.kardex(&product_id).await?))
}
