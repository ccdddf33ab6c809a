//! Application error types.

use axum::{
    Json,
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use vidhub_core::auth::AuthError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(m)
            | AppError::Unauthorized(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m)
            | AppError::PayloadTooLarge(m) => m.clone(),
            AppError::Internal(detail) => {
                error!(detail, "internal error");
                "Something went wrong".to_string()
            }
        };
        let body = Json(ErrorResponse {
            status_code: status.as_u16(),
            data: None,
            message,
            success: false,
            errors: Vec::new(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid user credentials".into()),
            AuthError::TokenInvalid => AppError::Unauthorized("Invalid or expired token".into()),
            AuthError::TokenStale => {
                AppError::Unauthorized("Refresh token is expired or used".into())
            }
            AuthError::IdentityNotFound => AppError::NotFound("User not found".into()),
            AuthError::Conflict(msg) => AppError::Conflict(msg),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Config(msg) => AppError::Internal(msg),
            AuthError::DbError(e) => AppError::Internal(e.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(e.body_text());
        }
        AppError::Validation(e.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(e: BytesRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(e.body_text());
        }
        AppError::Validation(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn failure_envelope_shape() {
        let resp = AppError::Conflict("Username or email already exists".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let json = body_json(resp).await;
        assert_eq!(json["statusCode"], 409);
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Username or email already exists");
        assert_eq!(json["errors"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn internal_detail_is_not_exposed() {
        let resp = AppError::Internal("connection refused on 10.0.0.5".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Something went wrong");
    }

    #[test]
    fn auth_errors_map_to_taxonomy() {
        let cases = [
            (AuthError::CredentialError, StatusCode::UNAUTHORIZED),
            (AuthError::TokenInvalid, StatusCode::UNAUTHORIZED),
            (AuthError::TokenStale, StatusCode::UNAUTHORIZED),
            (AuthError::IdentityNotFound, StatusCode::NOT_FOUND),
            (AuthError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AuthError::ValidationError("bad".into()), StatusCode::BAD_REQUEST),
            (AuthError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (auth, status) in cases {
            assert_eq!(AppError::from(auth).status(), status);
        }
    }
}
