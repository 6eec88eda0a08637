//! Order route handlers.
//!
//! Every order endpoint is owner-scoped: the authenticated user only ever
//! sees and mutates their own orders. Order detail responses embed the line
//! items.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::{ItemId, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{
    OrderRepository,
    orders::{OrderCreateError, OrderLine},
};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Order, OrderItem};
use crate::services::events::{self, OrderEvent};
use crate::state::AppState;

const fn default_quantity() -> i32 {
    1
}

/// A requested line item in an order create request.
///
/// `quantity` defaults to 1 when omitted.
#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub item_id: ItemId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Order create request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    pub items: Vec<OrderLineRequest>,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// An order together with its line items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// List the authenticated user's orders.
#[instrument(skip(state, current))]
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.0.id)
        .await?;
    Ok(Json(orders))
}

/// Get one of the authenticated user's orders, with its line items.
#[instrument(skip(state, current))]
pub async fn get(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_for_user(id, current.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
    let items = repo.items_for_order(id).await?;
    Ok(Json(OrderResponse { order, items }))
}

/// Create an order for the authenticated user.
///
/// The order and all its line items are written atomically; a request
/// naming an unknown item is rejected whole.
#[instrument(skip(state, current, body), fields(user_id = %current.0.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    if body.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "shipping_address is required".to_owned(),
        ));
    }
    if body.items.is_empty() {
        return Err(AppError::BadRequest(
            "an order needs at least one item".to_owned(),
        ));
    }
    if body.items.iter().any(|line| line.quantity < 1) {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_owned(),
        ));
    }

    let lines: Vec<OrderLine> = body
        .items
        .iter()
        .map(|line| OrderLine {
            item_id: line.item_id,
            quantity: line.quantity,
        })
        .collect();

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .create(current.0.id, body.shipping_address.trim(), &lines)
        .await
        .map_err(|err| match err {
            OrderCreateError::UnknownItem(_) => AppError::BadRequest(err.to_string()),
            OrderCreateError::Repository(e) => e.into(),
        })?;

    tracing::info!(order_id = %order.id, "Order created");

    let items = repo.items_for_order(order.id).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse { order, items })))
}

/// Set an order's status.
///
/// A transition into shipped or delivered notifies the owner; re-saving the
/// same status does not.
#[instrument(skip(state, current, body))]
pub async fn update_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status".to_owned()))?;

    let (previous, order) = OrderRepository::new(state.pool())
        .update_status(id, current.0.id, status)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("order {id} not found"))
            }
            other => other.into(),
        })?;

    events::dispatch(
        state.pool(),
        OrderEvent::StatusChanged {
            order_id: order.id,
            owner: current.0.id,
            from: previous,
            to: status,
        },
    )
    .await?;

    Ok(Json(order))
}

/// Delete one of the authenticated user's orders.
#[instrument(skip(state, current))]
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    let deleted = OrderRepository::new(state.pool())
        .delete_for_user(id, current.0.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("order {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_quantity_defaults_to_one() {
        let body: CreateOrderRequest = serde_json::from_str(
            r#"{"shipping_address": "1 Way", "items": [{"item_id": 3}]}"#,
        )
        .unwrap();

        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].item_id, ItemId::new(3));
        assert_eq!(body.items[0].quantity, 1);
    }

    #[test]
    fn test_line_item_accepts_explicit_quantity() {
        let body: CreateOrderRequest = serde_json::from_str(
            r#"{"shipping_address": "1 Way", "items": [{"item_id": 3, "quantity": 2}]}"#,
        )
        .unwrap();

        assert_eq!(body.items[0].quantity, 2);
    }
}
