//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use stockroom_core::ProductId;

use crate::db::products::{ProductFilter, SortField, SortOrder};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::Product;
use crate::policy::{self, Action};
use crate::services::CatalogService;
use crate::services::catalog::ProductPayload;
use crate::state::AppState;

use super::parse_id;

/// Fields of a product that callers may project with `?fields=`.
///
/// An explicit allow-list: unknown field names are rejected rather than
/// passed through to the store.
const PROJECTABLE_FIELDS: &[&str] = &[
    "id",
    "name",
    "price",
    "quantity",
    "created_at",
    "updated_at",
];

// =============================================================================
// Query Types
// =============================================================================

/// Raw listing query parameters. Everything arrives as strings and is
/// validated into a [`ProductFilter`] before any store access.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub fields: Option<String>,
}

/// Validated projection: the subset of fields to return, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection(Vec<String>);

impl Projection {
    /// Parse a comma-separated field list against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` naming the first unknown field.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut fields = Vec::new();
        for field in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            if !PROJECTABLE_FIELDS.contains(&field) {
                return Err(AppError::InvalidInput(format!(
                    "Unknown field in projection: {field}"
                )));
            }
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        Ok(Self(fields))
    }

    /// Apply the projection to a serialized product.
    fn apply(&self, product: &Product) -> Value {
        let full = json!(product);
        if self.0.is_empty() {
            return full;
        }
        let mut out = serde_json::Map::new();
        for field in &self.0 {
            if let Some(v) = full.get(field) {
                out.insert(field.clone(), v.clone());
            }
        }
        Value::Object(out)
    }
}

/// Validate the raw listing query into a filter and projection.
fn validate_query(query: &ListQuery) -> Result<(ProductFilter, Option<Projection>)> {
    let min_price = query
        .min_price
        .as_deref()
        .map(|p| {
            p.parse()
                .map_err(|_| AppError::InvalidInput(format!("Invalid min_price: {p}")))
        })
        .transpose()?;

    let max_price = query
        .max_price
        .as_deref()
        .map(|p| {
            p.parse()
                .map_err(|_| AppError::InvalidInput(format!("Invalid max_price: {p}")))
        })
        .transpose()?;

    let sort_by = query
        .sort_by
        .as_deref()
        .map(|s| {
            s.parse::<SortField>()
                .map_err(|_| AppError::InvalidInput(format!("Invalid sort_by: {s}")))
        })
        .transpose()?
        .unwrap_or_default();

    let order = match query.order.as_deref() {
        None | Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(other) => {
            return Err(AppError::InvalidInput(format!("Invalid order: {other}")));
        }
    };

    let projection = query.fields.as_deref().map(Projection::parse).transpose()?;

    Ok((
        ProductFilter {
            name: query.name.clone().filter(|n| !n.is_empty()),
            min_price,
            max_price,
            sort_by,
            order,
        },
        projection,
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products` - list the catalog with optional filters, sort,
/// and field projection. Public.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let (filter, projection) = validate_query(&query)?;

    let products = CatalogService::new(state.pool()).list(&filter).await?;

    let body = match projection {
        Some(projection) => Value::Array(
            products.iter().map(|p| projection.apply(p)).collect(),
        ),
        None => json!(products),
    };

    Ok(Json(body))
}

/// `GET /api/products/{id}` - fetch one product. Public.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id: ProductId = parse_id(&id)?;
    let product = CatalogService::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

/// `POST /api/products` - create a product. Admin only.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    policy::authorize(Some(&admin), Action::ManageCatalog)?;
    let product = CatalogService::new(state.pool()).create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - replace a product's fields. Admin only.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    policy::authorize(Some(&admin), Action::ManageCatalog)?;
    let id: ProductId = parse_id(&id)?;
    let product = CatalogService::new(state.pool()).update(id, &payload).await?;
    Ok(Json(product))
}

/// `DELETE /api/products/{id}` - delete a product. Admin only.
pub async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    policy::authorize(Some(&admin), Action::ManageCatalog)?;
    let id: ProductId = parse_id(&id)?;
    CatalogService::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Widget".to_string(),
            price: Decimal::new(1000, 2),
            quantity: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_projection_rejects_unknown_field() {
        let err = Projection::parse("name,password_hash").unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_projection_selects_fields() {
        let projection = Projection::parse("name, price").unwrap();
        let value = projection.apply(&sample_product());
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("name").unwrap(), "Widget");
        assert!(obj.contains_key("price"));
        assert!(!obj.contains_key("quantity"));
    }

    #[test]
    fn test_empty_projection_returns_all_fields() {
        let projection = Projection::parse("").unwrap();
        let value = projection.apply(&sample_product());
        assert!(value.get("id").is_some());
        assert!(value.get("updated_at").is_some());
    }

    #[test]
    fn test_validate_query_defaults() {
        let (filter, projection) = validate_query(&ListQuery::default()).unwrap();
        assert_eq!(filter.sort_by, SortField::Name);
        assert_eq!(filter.order, SortOrder::Asc);
        assert!(filter.name.is_none());
        assert!(projection.is_none());
    }

    #[test]
    fn test_validate_query_rejects_bad_sort() {
        let query = ListQuery {
            sort_by: Some("password_hash".to_string()),
            ..Default::default()
        };
        assert!(validate_query(&query).is_err());
    }

    #[test]
    fn test_validate_query_rejects_bad_order() {
        let query = ListQuery {
            order: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(validate_query(&query).is_err());
    }

    #[test]
    fn test_validate_query_rejects_bad_price() {
        let query = ListQuery {
            min_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(validate_query(&query).is_err());
    }

    #[test]
    fn test_validate_query_parses_bounds() {
        let query = ListQuery {
            min_price: Some("1.50".to_string()),
            max_price: Some("10".to_string()),
            order: Some("desc".to_string()),
            sort_by: Some("price".to_string()),
            ..Default::default()
        };
        let (filter, _) = validate_query(&query).unwrap();
        assert_eq!(filter.min_price, Some(Decimal::new(150, 2)));
        assert_eq!(filter.max_price, Some(Decimal::new(10, 0)));
        assert_eq!(filter.sort_by, SortField::Price);
        assert_eq!(filter.order, SortOrder::Desc);
    }
}
