//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::{OrderId, OrderStatus, ProductId, UserId};

/// An order record.
///
/// Created only by the order placement workflow. `total_price` is the
/// unit price at creation time multiplied by the quantity; it is a
/// snapshot and is never recomputed from the product.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owner of the order.
    pub user_id: UserId,
    /// Product that was ordered.
    pub product_id: ProductId,
    /// Units ordered, positive.
    pub quantity: i32,
    /// Price snapshot at creation time.
    pub total_price: Decimal,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Free-form delivery address, may be empty.
    pub delivery_address: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last mutated (status changes).
    pub updated_at: DateTime<Utc>,
}

/// One page of an order listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub items: Vec<Order>,
}
