//! Newtype wrappers for domain values.
//!
//! Every value that crosses a boundary (HTTP, database) gets a newtype so
//! that IDs from different entities cannot be mixed up and invalid values
//! cannot be constructed outside their `parse` functions.

pub mod email;
pub mod id;
pub mod price;
pub mod username;

pub use email::{Email, EmailError};
pub use id::{ProductId, UserId};
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
