//! Session request handlers: register, login, refresh, logout.

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use vidhub_core::models::auth::PublicIdentity;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ApiResponse, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenResponse,
};
use crate::services::auth;
use crate::services::cookies::{self, REFRESH_COOKIE};

/// `POST /api/v1/users/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<ApiResponse<PublicIdentity>> {
    let Json(body) = body?;
    let user = auth::register(state.store.as_ref(), body).await?;
    Ok(ApiResponse::new(
        StatusCode::CREATED,
        user,
        "User registered successfully",
    ))
}

/// `POST /api/v1/users/login` — authenticate and start a session.
///
/// Tokens are returned both as cookies and in the body.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let Json(body) = body?;
    let tokens = &state.config.tokens;
    let (resp, pair) = auth::login(state.store.as_ref(), tokens, body).await?;
    let jar = cookies::with_token_pair(jar, &pair, tokens, state.config.cookie_secure);
    Ok((jar, ApiResponse::ok(resp, "User logged in successfully")))
}

/// `POST /api/v1/users/refresh-token` — rotate the refresh token.
///
/// The token is read from the refresh cookie, else from `{refreshToken}` in
/// the body.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<(CookieJar, ApiResponse<TokenResponse>)> {
    let body = body?;
    let presented = match cookies::value(&jar, REFRESH_COOKIE) {
        Some(token) => Some(token.to_string()),
        None if body.is_empty() => None,
        None => {
            serde_json::from_slice::<RefreshRequest>(&body)
                .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
                .refresh_token
        }
    };

    let tokens = &state.config.tokens;
    let (resp, pair) = auth::refresh(state.store.as_ref(), tokens, presented.as_deref()).await?;
    let jar = cookies::with_token_pair(jar, &pair, tokens, state.config.cookie_secure);
    Ok((jar, ApiResponse::ok(resp, "Access token refreshed")))
}

/// `POST /api/v1/users/logout` — end the session. Requires authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    auth::logout(state.store.as_ref(), user.0.sub).await?;
    let jar = cookies::cleared(jar, state.config.cookie_secure);
    Ok((jar, ApiResponse::ok(serde_json::json!({}), "User logged out")))
}
