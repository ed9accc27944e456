//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{Price, ProductId, UserId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAuth};
use crate::models::{Product, ProductDraft, ProductFilter};
use crate::routes::Confirmation;
use crate::state::AppState;

/// Product record returned to clients.
#[derive(Debug, Serialize)]
pub struct ProductBody {
    pub id: ProductId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            owner_id: product.owner_id,
            title: product.title,
            description: product.description,
            category: product.category,
            price: product.price,
            image_url: product.image_url,
            created_at: product.created_at,
        }
    }
}

/// Create/update request body. `price` is a decimal string (e.g. `"19.99"`).
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub image_url: String,
}

impl ProductRequest {
    /// Validate field shape and convert into a draft.
    fn into_draft(self) -> Result<ProductDraft> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title cannot be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::BadRequest("category cannot be empty".to_string()));
        }

        Ok(ProductDraft {
            title: self.title,
            description: self.description,
            category: self.category,
            price: self.price,
            image_url: self.image_url,
        })
    }
}

/// Listing filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub keyword: Option<String>,
}

impl From<ListQuery> for ProductFilter {
    fn from(query: ListQuery) -> Self {
        // An empty parameter means "no filter"
        Self {
            category: query.category.filter(|s| !s.is_empty()),
            keyword: query.keyword.filter(|s| !s.is_empty()),
        }
    }
}

/// Load a product or fail with 404.
async fn load_product(state: &AppState, id: ProductId) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Fail with 403 unless the caller owns the product.
fn ensure_owner(product: &Product, caller: CurrentUser) -> Result<()> {
    if product.owner_id != caller.user_id {
        return Err(AppError::Forbidden(
            "only the owner may modify this product".to_string(),
        ));
    }
    Ok(())
}

/// Create a listing.
pub async fn create(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductBody>)> {
    let draft = body.into_draft()?;

    let product = ProductRepository::new(state.pool())
        .create(caller.user_id, &draft)
        .await?;

    tracing::info!(product_id = %product.id, owner_id = %caller.user_id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// List products, optionally filtered by category and/or title keyword.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductBody>>> {
    let products = ProductRepository::new(state.pool())
        .list(&query.into())
        .await?;

    Ok(Json(products.into_iter().map(ProductBody::from).collect()))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductBody>> {
    let product = load_product(&state, id).await?;
    Ok(Json(product.into()))
}

/// Replace a listing. Owner only.
pub async fn update(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductBody>> {
    let existing = load_product(&state, id).await?;
    ensure_owner(&existing, caller)?;

    let draft = body.into_draft()?;

    let updated = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await?
        // Deleted between the ownership check and the update
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(updated.into()))
}

/// Delete a listing. Owner only.
pub async fn delete(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Confirmation>> {
    let existing = load_product(&state, id).await?;
    ensure_owner(&existing, caller)?;

    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    tracing::info!(product_id = %id, owner_id = %caller.user_id, "product deleted");

    Ok(Json(Confirmation { ok: true }))
}
