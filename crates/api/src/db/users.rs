//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use bazaar_core::{Email, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Database row for a user, without the password hash.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: Email,
    username: Username,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Database row for a user joined with their password hash.
#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    id: UserId,
    email: Email,
    username: Username,
    created_at: DateTime<Utc>,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with email, username, and password hash.
    ///
    /// Email uniqueness is enforced by the storage layer; a duplicate is
    /// reported as `Conflict`, never raced via check-then-insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, username, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, email, username, created_at
            ",
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, username, created_at
            FROM users
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(
            r"
            SELECT id, email, username, created_at, password_hash
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            let user = User {
                id: r.id,
                email: r.email,
                username: r.username,
                created_at: r.created_at,
            };
            (user, r.password_hash)
        }))
    }
}
