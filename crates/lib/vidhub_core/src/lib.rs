//! # vidhub_core
//!
//! Core domain logic for Vidhub: identity records, credential hashing,
//! access/refresh token issuance and the refresh-token session slot.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
