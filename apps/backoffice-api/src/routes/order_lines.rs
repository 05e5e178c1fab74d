//! Order-line state changes.
//!
//! Completing a product line depletes its stock (FIFO); cancelling a
//! pending dish line returns the portions. A failed change leaves the line
//! in its previous state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use fogon_core::OrderLineState;
use fogon_db::service::inventory::StateChange;
use tracing::warn;

use super::acting_user;
use crate::dto::{MessageResponse, UpdateLineStateRequest};
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// `PATCH /order-lines/{id}`
pub async fn update_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<UpdateLineStateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse<StateChange>>, ApiError> {
    let Json(req) = payload?;
    let to: OrderLineState = req.state.parse()?;
    let user_id = acting_user(&headers)?;

    match state.inventory.update_line_state(&id, to, &user_id).await {
        Ok(change) => Ok(Json(MessageResponse::new("Order line state updated", change))),
        Err(e) => {
            let err = ApiError::from(e);
            if err.code == ErrorCode::DatabaseError {
                warn!(line_id = %id, to = %to, "Order line state not persisted");
                return Err(ApiError {
                    message: "Error updating order line state".to_string(),
                    ..err
                });
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use fogon_core::OrderItem;
    use fogon_db::service::inventory::ReceiveStock;
    use fogon_db::{Database, InventoryService};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    async fn product_line(db: &Database, stock: i64, ordered: i64) -> (String, String) {
        let product = db.inventory().insert_product("Chicha morada 1L", true).await.unwrap();
        InventoryService::new(db.clone())
            .receive_stock(ReceiveStock {
                product_id: product.id.clone(),
                user_id: "admin".to_string(),
                quantity: stock,
                batch: None,
                expiration_date: None,
                unit_price_cents: Some(800),
            })
            .await
            .unwrap();
        let order_id = db.orders().create_order().await.unwrap();
        let line = db
            .orders()
            .add_line(&order_id, OrderItem::Product(product.id.clone()), ordered)
            .await
            .unwrap();
        (line.id, product.id)
    }

    #[tokio::test]
    async fn test_completing_product_line_depletes_stock() {
        let (app, db) = app().await;
        let (line_id, product_id) = product_line(&db, 5, 2).await;
        let uri = format!("/order-lines/{}", line_id);

        let (status, _) = send(&app, "PATCH", &uri, Some(json!({"state": "in_delivery"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({"state": "completed"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Order line state updated");
        assert_eq!(body["data"]["line"]["state"], "completed");
        assert_eq!(body["data"]["ledger"].as_array().unwrap().len(), 2);

        assert_eq!(db.inventory().stock_on_hand(&product_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_409_and_not_persisted() {
        let (app, db) = app().await;
        let (line_id, product_id) = product_line(&db, 1, 4).await;
        let uri = format!("/order-lines/{}", line_id);
        send(&app, "PATCH", &uri, Some(json!({"state": "in_delivery"}))).await;

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({"state": "completed"}))).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        let line = db.orders().get_line(&line_id).await.unwrap().unwrap();
        assert_eq!(line.state, fogon_core::OrderLineState::InDelivery);
        assert_eq!(db.inventory().stock_on_hand(&product_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_disallowed_transition_is_400() {
        let (app, db) = app().await;
        let (line_id, _) = product_line(&db, 5, 1).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/order-lines/{}", line_id),
            Some(json!({"state": "completed"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_unknown_state_and_line() {
        let (app, _db) = app().await;

        let (status, _) = send(&app, "PATCH", "/order-lines/x", Some(json!({"state": "flying"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "PATCH", "/order-lines/x", Some(json!({"state": "cancelled"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancelling_dish_line_restocks() {
        let (app, db) = app().await;
        let dish = db.orders().insert_dish("Lomo saltado", 10).await.unwrap();
        let order_id = db.orders().create_order().await.unwrap();
        let line = db
            .orders()
            .add_line(&order_id, OrderItem::Dish(dish.id.clone()), 3)
            .await
            .unwrap();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/order-lines/{}", line.id),
            Some(json!({"state": "cancelled"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["line"]["state"], "cancelled");
        assert_eq!(db.orders().get_dish(&dish.id).await.unwrap().unwrap().quantity, 13);
    }
}
