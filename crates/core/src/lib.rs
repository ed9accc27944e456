//! Bazaar Core - Shared domain types.
//!
//! This crate provides the common types used across the Bazaar marketplace
//! components:
//! - `api` - HTTP server exposing registration, product CRUD, and cart/checkout
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, usernames, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
