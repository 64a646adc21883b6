//! Product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::ProductId;

/// A catalog product.
///
/// Invariant: `quantity >= 0` at all times, preserved under concurrent
/// order placement by the conditional stock decrement.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Units in stock, non-negative.
    pub quantity: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last mutated (CRUD or stock decrement).
    pub updated_at: DateTime<Utc>,
}
