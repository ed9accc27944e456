//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use bazaar_core::{Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Product, ProductDraft, ProductFilter};

/// Database row for a product. Shared with the cart repository, whose
/// listings join through to the same columns.
#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: ProductId,
    owner_id: UserId,
    title: String,
    description: String,
    category: String,
    price: Price,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            category: row.category,
            price: row.price,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, owner_id, title, description, category, price, image_url, created_at";

/// Escape `LIKE` wildcards in user-supplied keywords.
///
/// The escape character is `\`, declared with `ESCAPE` in the query.
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new product owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign key violation for a nonexistent owner).
    pub async fn create(
        &self,
        owner_id: UserId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO products (owner_id, title, description, category, price, image_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(owner_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price)
        .bind(&draft.image_url)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    /// List products, optionally filtered by exact category and/or a title
    /// substring.
    ///
    /// Keyword matching uses `LIKE` with wildcards escaped, so the keyword
    /// is always treated literally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(category) = &filter.category {
            query.push(" AND category = ");
            query.push_bind(category);
        }

        if let Some(keyword) = &filter.keyword {
            query.push(" AND title LIKE ");
            query.push_bind(format!("%{}%", escape_like(keyword)));
            query.push(" ESCAPE '\\'");
        }

        query.push(" ORDER BY id");

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Replace the writable fields of a product.
    ///
    /// Returns `None` if the product does not exist. The caller is
    /// responsible for the ownership check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE products
            SET title = ?1, description = ?2, category = ?3, price = ?4, image_url = ?5
            WHERE id = ?6
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price)
        .bind(&draft.image_url)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product.
    ///
    /// Cart and purchase rows referencing it are removed by the `ON DELETE
    /// CASCADE` constraints. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Email, Username};

    use super::*;
    use crate::db::{UserRepository, test_pool};
    use crate::models::User;

    async fn seed_user(pool: &SqlitePool, email: &str) -> User {
        UserRepository::new(pool)
            .create(
                &Email::parse(email).unwrap(),
                &Username::parse("seller").unwrap(),
                "hash",
            )
            .await
            .unwrap()
    }

    fn draft(title: &str, category: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_owned(),
            description: "a thing".to_owned(),
            category: category.to_owned(),
            price: Price::parse("19.99").unwrap(),
            image_url: "https://img.example/1.png".to_owned(),
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off"), "50\\% off");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "seller@example.com").await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(owner.id, &draft("Lamp", "home")).await.unwrap();
        assert_eq!(product.owner_id, owner.id);
        assert_eq!(product.price, Price::parse("19.99").unwrap());

        let found = repo.get(product.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Lamp");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        assert!(repo.get(ProductId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "seller@example.com").await;
        let repo = ProductRepository::new(&pool);

        repo.create(owner.id, &draft("Desk lamp", "home")).await.unwrap();
        repo.create(owner.id, &draft("Bike lamp", "sport")).await.unwrap();
        repo.create(owner.id, &draft("Tent", "sport")).await.unwrap();

        let all = repo.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let home = repo
            .list(&ProductFilter {
                category: Some("home".to_owned()),
                keyword: None,
            })
            .await
            .unwrap();
        assert_eq!(home.len(), 1);
        assert_eq!(home.first().unwrap().title, "Desk lamp");

        let lamps = repo
            .list(&ProductFilter {
                category: None,
                keyword: Some("lamp".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(lamps.len(), 2);

        let sport_lamps = repo
            .list(&ProductFilter {
                category: Some("sport".to_owned()),
                keyword: Some("lamp".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(sport_lamps.len(), 1);
        assert_eq!(sport_lamps.first().unwrap().title, "Bike lamp");
    }

    #[tokio::test]
    async fn test_list_keyword_is_literal() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "seller@example.com").await;
        let repo = ProductRepository::new(&pool);

        repo.create(owner.id, &draft("100% cotton shirt", "clothes"))
            .await
            .unwrap();
        repo.create(owner.id, &draft("1000 piece puzzle", "toys"))
            .await
            .unwrap();

        // "%" must not act as a wildcard
        let matches = repo
            .list(&ProductFilter {
                category: None,
                keyword: Some("100%".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.first().unwrap().title, "100% cotton shirt");
    }

    #[tokio::test]
    async fn test_update() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "seller@example.com").await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(owner.id, &draft("Lamp", "home")).await.unwrap();

        let updated = repo
            .update(product.id, &draft("Bright lamp", "home"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.title, "Bright lamp");
        assert_eq!(updated.owner_id, owner.id);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let updated = repo
            .update(ProductId::new(404), &draft("Ghost", "void"))
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "seller@example.com").await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(owner.id, &draft("Lamp", "home")).await.unwrap();

        assert!(repo.delete(product.id).await.unwrap());
        assert!(repo.get(product.id).await.unwrap().is_none());
        assert!(!repo.delete(product.id).await.unwrap());
    }
}
