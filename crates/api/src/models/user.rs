//! User domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{Email, UserId, Username};

/// A registered marketplace user (domain type).
///
/// The password hash never leaves the repository layer; it is not part of
/// this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// User's display name.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
