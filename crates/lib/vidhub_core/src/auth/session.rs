//! Session lifecycle: login, refresh-token rotation and logout.
//!
//! Per identity there is exactly one live refresh token, held in the store
//! slot. Login and rotation overwrite it; logout clears it. A refresh token is
//! accepted only when it verifies and still equals the slot value, so once
//! rotated the old token is unusable even though its signature is valid.

use tracing::{info, warn};
use uuid::Uuid;

use super::AuthError;
use super::jwt::{TokenConfig, issue_token_pair, verify_refresh_token};
use super::password::verify_password;
use crate::models::auth::{Identity, TokenPair, normalize_handle};
use crate::store::IdentityStore;

/// Login input: at least one of `username` / `email`, plus the password.
#[derive(Clone, Default)]
pub struct LoginCredentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Mint a pair for `identity` and make its refresh token the live one.
pub async fn start_session(
    store: &dyn IdentityStore,
    config: &TokenConfig,
    identity: &Identity,
) -> Result<TokenPair, AuthError> {
    let pair = issue_token_pair(identity, config)?;
    store.persist_refresh(identity.id, &pair.refresh_token).await?;
    Ok(pair)
}

/// Authenticate with username or email plus password.
///
/// Unknown identities and wrong passwords both yield `CredentialError`.
pub async fn login(
    store: &dyn IdentityStore,
    config: &TokenConfig,
    credentials: &LoginCredentials,
) -> Result<(Identity, TokenPair), AuthError> {
    let username = non_blank(credentials.username.as_deref());
    let email = non_blank(credentials.email.as_deref());
    if username.is_none() && email.is_none() {
        return Err(AuthError::ValidationError(
            "username or email is required".into(),
        ));
    }

    let identity = store
        .find_by_login(username.as_deref(), email.as_deref())
        .await?
        .ok_or(AuthError::CredentialError)?;

    if !verify_password(&credentials.password, &identity.password_hash)? {
        return Err(AuthError::CredentialError);
    }

    let pair = start_session(store, config, &identity).await?;
    info!(user_id = %identity.id, "user logged in");
    Ok((identity, pair))
}

/// Exchange a refresh token for a new pair, superseding the presented one.
///
/// Fails with `TokenInvalid` on a bad signature or expiry, `IdentityNotFound`
/// if the subject no longer exists, and `TokenStale` if the token is not the
/// one currently in the slot.
pub async fn rotate_refresh(
    store: &dyn IdentityStore,
    config: &TokenConfig,
    presented: &str,
) -> Result<(Identity, TokenPair), AuthError> {
    let claims = verify_refresh_token(presented, config)?;

    let identity = store
        .find_by_id(claims.sub)
        .await?
        .ok_or(AuthError::IdentityNotFound)?;

    let live = store.current_refresh(identity.id).await?;
    if live.as_deref() != Some(presented) {
        warn!(user_id = %identity.id, "stale refresh token presented");
        return Err(AuthError::TokenStale);
    }

    // Not a compare-and-swap: a concurrent rotation may overwrite this write.
    let pair = start_session(store, config, &identity).await?;
    Ok((identity, pair))
}

/// Empty the identity's refresh slot.
pub async fn logout(store: &dyn IdentityStore, identity_id: Uuid) -> Result<(), AuthError> {
    store.clear_refresh(identity_id).await?;
    info!(user_id = %identity_id, "user logged out");
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_handle)
        .filter(|v| !v.is_empty())
}
