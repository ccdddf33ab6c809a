//! Authentication service — account and session flows delegating to
//! `vidhub_core::auth`, shaped into API responses.

use uuid::Uuid;
use vidhub_core::auth::jwt::TokenConfig;
use vidhub_core::auth::session::LoginCredentials;
use vidhub_core::auth::{AuthError, accounts, session};
use vidhub_core::models::auth::{NewIdentity, PublicIdentity, TokenPair};
use vidhub_core::store::IdentityStore;

use crate::error::{AppError, AppResult};
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, TokenResponse,
    UpdateAccountRequest,
};

/// Register a new user account.
pub async fn register(
    store: &dyn IdentityStore,
    req: RegisterRequest,
) -> AppResult<PublicIdentity> {
    let new = NewIdentity {
        username: req.username,
        email: req.email,
        full_name: req.full_name,
        password: req.password,
        avatar: req.avatar,
        cover_image: req.cover_image,
    };
    let identity = accounts::register(store, new).await?;
    Ok(identity.public())
}

/// Authenticate with username or email plus password.
pub async fn login(
    store: &dyn IdentityStore,
    tokens: &TokenConfig,
    req: LoginRequest,
) -> AppResult<(LoginResponse, TokenPair)> {
    let credentials = LoginCredentials {
        username: req.username,
        email: req.email,
        password: req.password,
    };
    let (identity, pair) = session::login(store, tokens, &credentials).await?;
    let resp = LoginResponse {
        user: identity.public(),
        access_token: pair.access_token.clone(),
        refresh_token: pair.refresh_token.clone(),
    };
    Ok((resp, pair))
}

/// Exchange a refresh token for a new pair (single-use rotation).
///
/// Every failure is reported as 401; the client has to log in again.
pub async fn refresh(
    store: &dyn IdentityStore,
    tokens: &TokenConfig,
    refresh_token: Option<&str>,
) -> AppResult<(TokenResponse, TokenPair)> {
    let presented = refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".into()))?;

    let (_, pair) = session::rotate_refresh(store, tokens, presented)
        .await
        .map_err(|e| match e {
            AuthError::IdentityNotFound => AppError::Unauthorized("Invalid refresh token".into()),
            other => AppError::from(other),
        })?;

    let resp = TokenResponse {
        access_token: pair.access_token.clone(),
        refresh_token: pair.refresh_token.clone(),
    };
    Ok((resp, pair))
}

/// Logout — empty the caller's refresh slot.
pub async fn logout(store: &dyn IdentityStore, user_id: Uuid) -> AppResult<()> {
    match session::logout(store, user_id).await {
        // The account is gone; there is no session left to end.
        Ok(()) | Err(AuthError::IdentityNotFound) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Fetch the caller's profile.
pub async fn current_user(
    store: &dyn IdentityStore,
    user_id: Uuid,
) -> AppResult<PublicIdentity> {
    let identity = accounts::current_identity(store, user_id).await?;
    Ok(identity.public())
}

/// Change the caller's password.
pub async fn change_password(
    store: &dyn IdentityStore,
    user_id: Uuid,
    req: ChangePasswordRequest,
) -> AppResult<()> {
    accounts::change_password(store, user_id, &req.old_password, &req.new_password).await?;
    Ok(())
}

/// Update the caller's display name and email.
pub async fn update_account(
    store: &dyn IdentityStore,
    user_id: Uuid,
    req: UpdateAccountRequest,
) -> AppResult<PublicIdentity> {
    let identity = accounts::update_account(store, user_id, &req.full_name, &req.email).await?;
    Ok(identity.public())
}
