//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! POST /auth/register          - Create an account
//! POST /auth/login             - Exchange credentials for an access token
//! GET  /auth/me                - Current user record (requires auth)
//!
//! # Products
//! POST   /products/            - Create a listing (requires auth)
//! GET    /products/            - List products (?category=&keyword=)
//! GET    /products/{id}        - Product detail
//! PUT    /products/{id}        - Replace a listing (owner only)
//! DELETE /products/{id}        - Delete a listing (owner only)
//!
//! # Cart (requires auth)
//! POST /cart/add/{id}          - Add a product to the cart
//! GET  /cart/                  - Products currently in the cart
//! POST /cart/checkout          - Move the cart into the purchase history
//! GET  /cart/purchases         - Purchase history
//! ```
//!
//! Authenticated routes accept the access token as `Authorization: Bearer`
//! or as a `?token=` query parameter.

pub mod auth;
pub mod cart;
pub mod products;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Generic confirmation body for mutations that return no record.
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub ok: bool,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{id}", post(cart::add))
        .route("/checkout", post(cart::checkout))
        .route("/purchases", get(cart::purchases))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
