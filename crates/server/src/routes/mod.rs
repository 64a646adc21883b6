//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (database ping)
//! GET    /api/info                 - API name and version
//!
//! # Products
//! GET    /api/products             - List products (filters, sort, projection)
//! GET    /api/products/{id}        - Product detail
//! POST   /api/products             - Create product (admin)
//! PUT    /api/products/{id}        - Update product (admin)
//! DELETE /api/products/{id}        - Delete product (admin)
//!
//! # Auth
//! POST   /api/auth/register        - Register and start a session
//! POST   /api/auth/login           - Login
//! POST   /api/auth/logout          - Logout (idempotent)
//! GET    /api/auth/me              - Current principal or null
//!
//! # Orders
//! GET    /api/orders               - List orders (own, or all for admin)
//! POST   /api/orders               - Place an order
//! PATCH  /api/orders/{id}/status   - Set order status (admin)
//! DELETE /api/orders/{id}          - Delete an order (owner or admin)
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use std::str::FromStr;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Parse a path segment into a typed ID.
///
/// # Errors
///
/// Returns `AppError::InvalidId` for anything that is not a well-formed
/// integer ID, before any store access.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::InvalidId(format!("Invalid id: {raw}")))
}

/// `GET /api/info` - API identification for smoke tests and tooling.
async fn info() -> impl IntoResponse {
    Json(json!({
        "name": "stockroom",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// JSON 404 for unknown API paths, so API clients never get an HTML body.
async fn api_fallback() -> impl IntoResponse {
    let body = json!({
        "error": { "kind": "not_found", "message": "API endpoint not found" }
    });
    (StatusCode::NOT_FOUND, Json(body))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}/status", patch(orders::update_status))
        .route("/{id}", delete(orders::destroy))
}

/// Create all API routes under `/api`.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/info", get(info))
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
        .fallback(api_fallback);

    Router::new().nest("/api", api)
}
