//! Authentication middleware — access-token extraction and JWT verification.
//!
//! The access cookie is preferred; `Authorization: Bearer <token>` is the
//! fallback for non-browser clients. Verification is offline and never falls
//! back to a refresh: that is an explicit client call.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use vidhub_core::auth::jwt::{TokenConfig, verify_access_token};
use vidhub_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::{self, ACCESS_COOKIE};

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Pick the presented access token: cookie first, then bearer header.
pub fn extract_access_token<'a>(
    jar: &'a CookieJar,
    headers: &'a HeaderMap,
) -> Option<&'a str> {
    cookies::value(jar, ACCESS_COOKIE).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
    })
}

/// Resolve a presented credential to identity claims.
pub fn authenticate(
    presented: Option<&str>,
    tokens: &TokenConfig,
) -> Result<TokenClaims, AppError> {
    let token = presented.ok_or_else(|| {
        debug!("auth: no access token presented");
        AppError::Unauthorized("Unauthorized request".into())
    })?;
    verify_access_token(token, tokens).map_err(|e| {
        debug!("auth: access token rejected: {e}");
        AppError::Unauthorized("Invalid access token".into())
    })
}

/// Axum middleware: verifies the access token and injects
/// `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(
        extract_access_token(&jar, request.headers()),
        &state.config.tokens,
    )?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn cookie_wins_over_header() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_COOKIE, "from-cookie"));
        assert_eq!(
            extract_access_token(&jar, &bearer("from-header")),
            Some("from-cookie")
        );
    }

    #[test]
    fn header_is_fallback() {
        let jar = CookieJar::new();
        assert_eq!(
            extract_access_token(&jar, &bearer("from-header")),
            Some("from-header")
        );
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        for raw in ["bearer abc.def", "BEARER abc.def", "Bearer  abc.def"] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_static(raw));
            assert_eq!(
                extract_access_token(&CookieJar::new(), &headers),
                Some("abc.def"),
                "{raw:?}"
            );
        }
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer "));
        assert_eq!(extract_access_token(&CookieJar::new(), &headers), None);
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_access_token(&CookieJar::new(), &headers), None);
    }

    #[test]
    fn missing_credential_is_unauthorized() {
        let tokens = TokenConfig::new(
            "a",
            "r",
            chrono::Duration::minutes(1),
            chrono::Duration::minutes(1),
        )
        .unwrap();
        assert!(matches!(
            authenticate(None, &tokens),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            authenticate(Some("garbage"), &tokens),
            Err(AppError::Unauthorized(_))
        ));
    }
}
