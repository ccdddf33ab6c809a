//! Profile request handlers for the authenticated caller.

use axum::Extension;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use vidhub_core::models::auth::PublicIdentity;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ApiResponse, ChangePasswordRequest, UpdateAccountRequest};
use crate::services::auth;

/// `GET /api/v1/users/current-user` — the caller's profile.
pub async fn current_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<ApiResponse<PublicIdentity>> {
    let profile = auth::current_user(state.store.as_ref(), user.0.sub).await?;
    Ok(ApiResponse::ok(profile, "Current user fetched"))
}

/// `POST /api/v1/users/change-password`
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let Json(body) = body?;
    auth::change_password(state.store.as_ref(), user.0.sub, body).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// `PATCH /api/v1/users/update-account`
pub async fn update_account_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> AppResult<ApiResponse<PublicIdentity>> {
    let Json(body) = body?;
    let profile = auth::update_account(state.store.as_ref(), user.0.sub, body).await?;
    Ok(ApiResponse::ok(profile, "Account details updated successfully"))
}
