//! Domain types.
//!
//! These types represent validated domain objects separate from database
//! row types and wire-format request/response bodies.

pub mod product;
pub mod user;

pub use product::{Product, ProductDraft, ProductFilter};
pub use user::User;
