//! Order repository for database operations.
//!
//! Holds the one multi-entity operation in the system: placing an order,
//! which decrements product stock and inserts the order record inside a
//! single transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::Order;

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    total_price: Decimal,
    status: String,
    delivery_address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            total_price: self.total_price,
            status,
            delivery_address: self.delivery_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Order total: the unit price at the moment stock was claimed times the
/// quantity. A snapshot; later price changes never affect it.
fn total_price(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Outcome of an order placement attempt.
///
/// Distinguishing the two failure shapes here keeps the workflow's error
/// mapping out of SQL-speaking code.
#[derive(Debug)]
pub enum PlacementOutcome {
    /// Stock was decremented and the order recorded.
    Created(Order),
    /// The product does not exist.
    ProductMissing,
    /// The product exists but has fewer units than requested.
    InsufficientStock,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Atomically decrement product stock and record the order.
    ///
    /// The stock check-then-decrement is a single conditional UPDATE
    /// (`... WHERE id = $1 AND quantity >= $2`), so two concurrent orders
    /// for the last unit cannot both succeed and quantity can never go
    /// negative. The decrement and the order insert share one transaction:
    /// either both take effect or neither does.
    ///
    /// `total_price` is computed from the price returned by the decrement,
    /// i.e. the unit price in force at the moment stock was claimed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn place(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        delivery_address: &str,
    ) -> Result<PlacementOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let price: Option<Decimal> = sqlx::query_scalar(
            r"
            UPDATE products
            SET quantity = quantity - $2, updated_at = now()
            WHERE id = $1 AND quantity >= $2
            RETURNING price
            ",
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(price) = price else {
            // Nothing matched: either the product is gone or stock ran out.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                    .bind(product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Ok(if exists {
                PlacementOutcome::InsufficientStock
            } else {
                PlacementOutcome::ProductMissing
            });
        };

        let total_price = total_price(price, quantity);

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, product_id, quantity, total_price, delivery_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, product_id, quantity, total_price, status,
                      delivery_address, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(total_price)
        .bind(delivery_address)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PlacementOutcome::Created(row.into_order()?))
    }

    /// List orders newest-first, optionally filtered to one owner.
    ///
    /// Returns the page of orders and the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        owner: Option<UserId>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        // Saturate: an absurd page is a valid request for an empty page,
        // not an overflow.
        let offset = page.saturating_sub(1).saturating_mul(limit);

        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, product_id, quantity, total_price, status,
                   delivery_address, created_at, updated_at
            FROM orders
            WHERE $1::integer IS NULL OR user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(owner)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE $1::integer IS NULL OR user_id = $1",
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(OrderRow::into_order)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((orders, total))
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, product_id, quantity, total_price, status,
                   delivery_address, created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Set an order's status, refreshing `updated_at`.
    ///
    /// Returns the updated order, or `None` if no order with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, product_id, quantity, total_price, status,
                      delivery_address, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Delete an order.
    ///
    /// Deletion never restores decremented stock.
    ///
    /// Returns `true` if an order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_price_snapshot_arithmetic() {
        let unit: Decimal = "19.99".parse().unwrap();
        assert_eq!(total_price(unit, 3), "59.97".parse().unwrap());
        assert_eq!(total_price(unit, 1), unit);
    }

    #[test]
    fn test_total_price_keeps_scale() {
        let unit: Decimal = "0.10".parse().unwrap();
        assert_eq!(total_price(unit, 100).to_string(), "10.00");
    }

    #[tokio::test]
    async fn test_list_offset_arithmetic_never_overflows() {
        // A lazy pool that can't connect: the query itself must fail, but
        // the offset computation for an enormous page must not panic.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .unwrap();
        let repo = OrderRepository::new(&pool);

        let result = repo.list(None, i64::MAX, 100).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
