//! Identity persistence.
//!
//! The document store is reduced to what the auth core needs: lookup by id or
//! login handle, insertion, and single-field updates. In particular the
//! refresh-token slot is written on its own so that unrelated fields (and the
//! password hash) are never re-validated or re-hashed.
//!
//! Writes to the refresh slot are last-writer-wins. Two concurrent refreshes of
//! the same token can both pass the equality check before either writes; the
//! later write determines which new refresh token stays live.

mod memory;
mod postgres;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::PasswordHash;
use crate::models::auth::Identity;

/// Storage backend for identities and their session slot.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Persist a new identity. Fails with `Conflict` if the username or email
    /// is already taken.
    async fn insert(&self, identity: Identity) -> Result<Identity, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError>;

    /// Find an identity whose username or email matches either given value.
    /// Both inputs are expected to be normalized already.
    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Identity>, AuthError>;

    /// Overwrite the stored refresh token.
    async fn persist_refresh(&self, id: Uuid, refresh_token: &str) -> Result<(), AuthError>;

    /// Empty the refresh slot (logout).
    async fn clear_refresh(&self, id: Uuid) -> Result<(), AuthError>;

    /// Read the refresh slot. `Ok(None)` covers both an empty slot and a
    /// missing identity.
    async fn current_refresh(&self, id: Uuid) -> Result<Option<String>, AuthError>;

    async fn update_password(&self, id: Uuid, hash: &PasswordHash) -> Result<(), AuthError>;

    /// Replace the display name and email. Fails with `Conflict` if the email
    /// belongs to another identity.
    async fn update_account(
        &self,
        id: Uuid,
        full_name: &str,
        email: &str,
    ) -> Result<Identity, AuthError>;
}

pub(crate) fn duplicate_identity() -> AuthError {
    AuthError::Conflict("Username or email already exists".into())
}
