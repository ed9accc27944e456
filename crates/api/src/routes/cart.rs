//! Cart and checkout route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use bazaar_core::ProductId;

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::Confirmation;
use crate::routes::products::ProductBody;
use crate::state::AppState;

/// Checkout response: how many cart entries became purchases.
#[derive(Debug, Serialize)]
pub struct CheckoutBody {
    pub ok: bool,
    pub purchased: u64,
}

/// Add a product to the caller's cart.
///
/// No duplicate or stock check; adding twice leaves two entries. A missing
/// product surfaces as 404 via the repository's foreign key mapping.
pub async fn add(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Confirmation>> {
    CartRepository::new(state.pool())
        .add(caller.user_id, id)
        .await?;

    Ok(Json(Confirmation { ok: true }))
}

/// List the products currently in the caller's cart.
pub async fn show(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductBody>>> {
    let products = CartRepository::new(state.pool())
        .cart_products(caller.user_id)
        .await?;

    Ok(Json(products.into_iter().map(ProductBody::from).collect()))
}

/// Move every cart entry into the purchase history and empty the cart.
pub async fn checkout(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<CheckoutBody>> {
    let purchased = CartRepository::new(state.pool())
        .checkout(caller.user_id)
        .await?;

    tracing::info!(user_id = %caller.user_id, purchased, "checkout completed");

    Ok(Json(CheckoutBody {
        ok: true,
        purchased,
    }))
}

/// List the caller's purchase history.
pub async fn purchases(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductBody>>> {
    let products = CartRepository::new(state.pool())
        .purchased_products(caller.user_id)
        .await?;

    Ok(Json(products.into_iter().map(ProductBody::from).collect()))
}
