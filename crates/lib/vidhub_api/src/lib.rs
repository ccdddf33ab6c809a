//! # vidhub_api
//!
//! HTTP API library for Vidhub.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tracing::warn;
use vidhub_core::store::IdentityStore;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, users};

/// Maximum accepted request body size (16 KiB).
const BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn IdentityStore>,
    /// API configuration.
    pub config: ApiConfig,
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = config
        .cors_origin
        .as_deref()
        .and_then(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, "ignoring invalid CORS origin: {e}");
                None
            }
        });
    match origin {
        // Credentialed CORS cannot use wildcards.
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTHCHECK, get(health::healthcheck_handler))
        .route(routes::POST_USERS_REGISTER, post(auth::register_handler))
        .route(routes::POST_USERS_LOGIN, post(auth::login_handler))
        .route(routes::POST_USERS_REFRESH_TOKEN, post(auth::refresh_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::POST_USERS_LOGOUT, post(auth::logout_handler))
        .route(
            routes::GET_USERS_CURRENT_USER,
            get(users::current_user_handler),
        )
        .route(
            routes::POST_USERS_CHANGE_PASSWORD,
            post(users::change_password_handler),
        )
        .route(
            routes::PATCH_USERS_UPDATE_ACCOUNT,
            patch(users::update_account_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(state)
}
