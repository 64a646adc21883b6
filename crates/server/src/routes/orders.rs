//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use stockroom_core::{OrderId, OrderStatus, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::order::OrderPage;
use crate::policy::{self, Action};
use crate::services::OrderService;
use crate::services::orders::clamp_pagination;
use crate::state::AppState;

use super::parse_id;

/// Pagination query. Non-numeric values fall back to the defaults, then
/// everything is clamped to the allowed range.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Order placement payload.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderPayload {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub delivery_address: String,
}

/// Status change payload.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: String,
}

/// `GET /api/orders` - list orders, newest first. Users see their own
/// orders; admins see everyone's.
pub async fn index(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<OrderPage>> {
    let (page, limit) = clamp_pagination(
        query.page.as_deref().and_then(|p| p.parse().ok()),
        query.limit.as_deref().and_then(|l| l.parse().ok()),
    );

    let orders = OrderService::new(state.pool())
        .list_for(&caller, page, limit)
        .await?;

    Ok(Json(orders))
}

/// `POST /api/orders` - place an order for the caller.
pub async fn create(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderPayload>,
) -> Result<impl IntoResponse> {
    policy::authorize(Some(&caller), Action::PlaceOrder)?;

    let product_id = payload
        .product_id
        .and_then(|id| i32::try_from(id).ok())
        .map(ProductId::new)
        .ok_or_else(|| AppError::InvalidId("Invalid product_id".to_string()))?;

    let quantity = payload
        .quantity
        .unwrap_or(1)
        .try_into()
        .map_err(|_| AppError::InvalidInput("Invalid quantity".to_string()))?;

    let order = OrderService::new(state.pool())
        .place_order(caller.id, product_id, quantity, &payload.delivery_address)
        .await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %caller.id,
        product_id = %order.product_id,
        quantity = order.quantity,
        "order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// `PATCH /api/orders/{id}/status` - set an order's status. Admin only.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<Value>> {
    let id: OrderId = parse_id(&id)?;
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::InvalidStatus(payload.status.clone()))?;

    let order = OrderService::new(state.pool())
        .update_status(&admin, id, status)
        .await?;

    Ok(Json(json!(order)))
}

/// `DELETE /api/orders/{id}` - delete an order. Owner or admin.
///
/// Deleting never restores the stock that placement decremented.
pub async fn destroy(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id: OrderId = parse_id(&id)?;

    OrderService::new(state.pool()).delete(&caller, id).await?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
