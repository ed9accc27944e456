//! Business logic services for the marketplace API.
//!
//! # Services
//!
//! - `auth` - Registration and login (Argon2id password hashing)
//! - `token` - Signed access tokens (HS256, embedded user id, expiry)

pub mod auth;
pub mod token;
