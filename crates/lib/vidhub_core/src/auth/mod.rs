//! Authentication and session logic.
//!
//! Provides password hashing, JWT issuance and verification, refresh-token
//! rotation and the account flows shared by the HTTP layer.

pub mod accounts;
pub mod jwt;
pub mod password;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Refresh token is expired or used")]
    TokenStale,

    #[error("Identity not found")]
    IdentityNotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
