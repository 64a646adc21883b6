//! Order service: the placement workflow, listing, status transitions,
//! and ownership-checked deletion.

use sqlx::PgPool;

use stockroom_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::db::orders::{OrderRepository, PlacementOutcome};
use crate::error::{AppError, Result};
use crate::models::order::{Order, OrderPage};
use crate::models::session::CurrentUser;
use crate::policy::{self, Action};

/// Default page size for order listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum page size for order listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp raw pagination parameters to `page >= 1`, `1 <= limit <= 100`.
#[must_use]
pub fn clamp_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}

/// Order service over the order and catalog stores.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for the caller.
    ///
    /// Validates the quantity before any store access, then delegates to
    /// the transactional conditional decrement + insert. The returned
    /// order carries its assigned ID and the snapshot `total_price`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if `quantity` is not positive.
    /// Returns `AppError::NotFound` if the product does not exist.
    /// Returns `AppError::InsufficientStock` if stock is short; no state
    /// is mutated in either failure case.
    pub async fn place_order(
        &self,
        caller: UserId,
        product_id: ProductId,
        quantity: i32,
        delivery_address: &str,
    ) -> Result<Order> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput("Invalid quantity".to_string()));
        }

        match self
            .orders
            .place(caller, product_id, quantity, delivery_address)
            .await?
        {
            PlacementOutcome::Created(order) => Ok(order),
            PlacementOutcome::ProductMissing => {
                Err(AppError::NotFound("Product not found".to_string()))
            }
            PlacementOutcome::InsufficientStock => Err(AppError::InsufficientStock),
        }
    }

    /// List orders for the caller: own orders for users, all orders for
    /// admins. Newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if a query fails.
    pub async fn list_for(
        &self,
        caller: &CurrentUser,
        page: i64,
        limit: i64,
    ) -> Result<OrderPage> {
        let owner = if caller.role.is_admin() {
            None
        } else {
            policy::authorize(Some(caller), Action::ReadOrders { owner: caller.id })?;
            Some(caller.id)
        };

        let (items, total) = self.orders.list(owner, page, limit).await?;

        Ok(OrderPage {
            page,
            limit,
            total,
            items,
        })
    }

    /// Set an order's status. Admin-only; enforced by the caller's route
    /// guard, re-checked here against the policy.
    ///
    /// Any status in the allowed set is accepted; there is no enforced
    /// ordering between states.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if the caller is not an admin.
    /// Returns `AppError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        caller: &CurrentUser,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order> {
        policy::authorize(Some(caller), Action::ChangeOrderStatus)?;

        self.orders
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Delete an order. Permitted for the owner or an admin, in any
    /// status. Deletion never restores decremented stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order does not exist.
    /// Returns `AppError::Forbidden` if the caller is neither owner nor
    /// admin.
    pub async fn delete(&self, caller: &CurrentUser, id: OrderId) -> Result<()> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        policy::authorize(
            Some(caller),
            Action::DeleteOrder {
                owner: order.user_id,
            },
        )?;

        // Between the ownership check and the delete the order may vanish;
        // a second miss is still a successful outcome for the caller.
        self.orders.delete(id).await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_place_order_rejects_nonpositive_quantity_before_store_access() {
        // A lazy pool that can't connect: if the guard let a bad quantity
        // through, the call would hit the store and fail differently.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .unwrap();
        let service = OrderService::new(&pool);

        for quantity in [0, -3] {
            let err = service
                .place_order(UserId::new(1), ProductId::new(1), quantity, "")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_clamp_pagination_defaults() {
        assert_eq!(clamp_pagination(None, None), (1, 10));
    }

    #[test]
    fn test_clamp_pagination_floors() {
        assert_eq!(clamp_pagination(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_pagination(Some(-5), Some(-5)), (1, 1));
    }

    #[test]
    fn test_clamp_pagination_ceiling() {
        assert_eq!(clamp_pagination(Some(3), Some(1000)), (3, 100));
    }

    #[test]
    fn test_clamp_pagination_passthrough() {
        assert_eq!(clamp_pagination(Some(2), Some(25)), (2, 25));
    }
}
