//! Cart and purchase-history repository.
//!
//! Both relations are plain user/product join tables: no quantity, no
//! timestamp. A product can sit in a cart more than once; checkout moves
//! every row.

use sqlx::SqlitePool;

use bazaar_core::{ProductId, UserId};

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::Product;

/// Repository for cart and purchase operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a product to a user's cart.
    ///
    /// No duplicate check: adding the same product twice leaves two rows.
    /// A nonexistent product is detected from the foreign key violation, so
    /// there is no window between an existence check and the insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO cart_items (user_id, product_id) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::Database(e)
            })?;

        Ok(())
    }

    /// List the products currently in a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cart_products(&self, user_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT p.id, p.owner_id, p.title, p.description, p.category,
                   p.price, p.image_url, p.created_at
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?1
            ORDER BY c.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List the products in a user's purchase history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn purchased_products(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT p.id, p.owner_id, p.title, p.description, p.category,
                   p.price, p.image_url, p.created_at
            FROM purchases pu
            JOIN products p ON p.id = pu.product_id
            WHERE pu.user_id = ?1
            ORDER BY pu.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Move every cart entry into the purchase history and clear the cart.
    ///
    /// Runs in a single transaction so the cart cannot be observed half
    /// moved. Returns the number of entries moved (zero for an empty cart).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn checkout(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let moved = sqlx::query(
            r"
            INSERT INTO purchases (user_id, product_id)
            SELECT user_id, product_id FROM cart_items WHERE user_id = ?1
            ",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(moved)
    }
}
