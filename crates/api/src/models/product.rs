//! Product domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{Price, ProductId, UserId};

/// A product listed on the marketplace (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// User who listed this product. Only the owner may update or delete it.
    pub owner_id: UserId,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Category name, matched exactly when filtering.
    pub category: String,
    /// Asking price.
    pub price: Price,
    /// Reference to the listing image.
    pub image_url: String,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
}

/// The writable fields of a product.
///
/// Used both when creating a listing and when replacing one via update;
/// the owner and timestamps are never client-writable.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub image_url: String,
}

/// Filters for listing products.
///
/// `category` is an exact match; `keyword` is a substring match on the
/// title.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub keyword: Option<String>,
}
