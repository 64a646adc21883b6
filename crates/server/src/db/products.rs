//! Product repository for database operations.
//!
//! The listing query is assembled with `QueryBuilder` because filters and
//! sort order are caller-supplied; sort columns come from a closed enum,
//! never from raw request strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use stockroom_core::ProductId;

use super::RepositoryError;
use crate::models::product::Product;

/// Columns the catalog listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Price,
    Quantity,
    CreatedAt,
}

impl SortField {
    /// SQL column name. Closed set, safe to splice into the query text.
    const fn as_column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::CreatedAt => "created_at",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "quantity" => Ok(Self::Quantity),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(format!("unknown sort field: {s}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated catalog listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Sort column.
    pub sort_by: SortField,
    /// Sort direction.
    pub order: SortOrder,
}

/// Fields a product payload may be updated with.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            name: r.name,
            price: r.price,
            quantity: r.quantity,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Escape LIKE wildcards in a user-supplied substring pattern.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, name, price, quantity, created_at, updated_at FROM products WHERE TRUE",
        );

        if let Some(name) = &filter.name {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(name)));
        }
        if let Some(min) = filter.min_price {
            qb.push(" AND price >= ");
            qb.push_bind(min);
        }
        if let Some(max) = filter.max_price {
            qb.push(" AND price <= ");
            qb.push_bind(max);
        }

        qb.push(" ORDER BY ");
        qb.push(filter.sort_by.as_column());
        qb.push(" ");
        qb.push(filter.order.as_sql());

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, price, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, quantity, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a product's fields.
    ///
    /// Returns the updated product, or `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, price = $3, quantity = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, quantity, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product.
    ///
    /// Returns `true` if a product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("name".parse::<SortField>(), Ok(SortField::Name));
        assert_eq!("price".parse::<SortField>(), Ok(SortField::Price));
        assert_eq!("quantity".parse::<SortField>(), Ok(SortField::Quantity));
        assert_eq!("created_at".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert!("password_hash".parse::<SortField>().is_err());
        assert!("".parse::<SortField>().is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
