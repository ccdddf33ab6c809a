//! Health check endpoint.

use crate::models::{ApiResponse, HealthResponse};

/// `GET /api/v1/healthcheck` — liveness check.
pub async fn healthcheck_handler() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(
        HealthResponse {
            status: "ok".into(),
            version: vidhub_core::version().into(),
        },
        "OK",
    )
}
