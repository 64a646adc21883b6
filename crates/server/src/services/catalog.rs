//! Catalog service: product CRUD with payload validation.

use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::ProductId;

use crate::db::products::{ProductFilter, ProductInput, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::product::Product;

/// Raw product payload as received from the client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
}

/// Catalog service over the product store.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// List products matching a validated filter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        Ok(self.products.list(filter).await?)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Create a product from a client payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the payload fails validation.
    pub async fn create(&self, payload: &ProductPayload) -> Result<Product> {
        let input = validate_payload(payload)?;
        Ok(self.products.create(&input).await?)
    }

    /// Replace a product's fields from a client payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the payload fails validation.
    /// Returns `AppError::NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, payload: &ProductPayload) -> Result<Product> {
        let input = validate_payload(payload)?;
        self.products
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Product not found".to_string()))
        }
    }
}

/// Validate a raw product payload into repository input.
///
/// Detected and reported before any store access.
fn validate_payload(payload: &ProductPayload) -> Result<ProductInput> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Invalid or missing field: name".to_string()))?;

    let price = payload
        .price
        .filter(|p| !p.is_sign_negative())
        .ok_or_else(|| AppError::InvalidInput("Invalid or missing field: price".to_string()))?;

    let quantity = payload
        .quantity
        .and_then(|q| i32::try_from(q).ok())
        .filter(|q| *q >= 0)
        .ok_or_else(|| AppError::InvalidInput("Invalid or missing field: quantity".to_string()))?;

    Ok(ProductInput {
        name: name.to_string(),
        price,
        quantity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, price: Option<&str>, quantity: Option<i64>) -> ProductPayload {
        ProductPayload {
            name: name.map(String::from),
            price: price.map(|p| p.parse().unwrap()),
            quantity,
        }
    }

    #[test]
    fn test_valid_payload() {
        let input = validate_payload(&payload(Some("Widget"), Some("10.00"), Some(5))).unwrap();
        assert_eq!(input.name, "Widget");
        assert_eq!(input.price, "10.00".parse::<Decimal>().unwrap());
        assert_eq!(input.quantity, 5);
    }

    #[test]
    fn test_name_is_trimmed() {
        let input = validate_payload(&payload(Some("  Widget  "), Some("1"), Some(0))).unwrap();
        assert_eq!(input.name, "Widget");
    }

    #[test]
    fn test_missing_or_blank_name_rejected() {
        assert!(validate_payload(&payload(None, Some("1"), Some(1))).is_err());
        assert!(validate_payload(&payload(Some("   "), Some("1"), Some(1))).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = validate_payload(&payload(Some("W"), Some("-0.01"), Some(1))).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_zero_price_allowed() {
        assert!(validate_payload(&payload(Some("W"), Some("0"), Some(1))).is_ok());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        assert!(validate_payload(&payload(Some("W"), Some("1"), Some(-1))).is_err());
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        assert!(validate_payload(&payload(Some("W"), Some("1"), Some(i64::MAX))).is_err());
    }
}
