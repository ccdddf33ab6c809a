//! Cookie service — set/clear httpOnly auth cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use vidhub_core::auth::jwt::TokenConfig;
use vidhub_core::models::auth::TokenPair;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

fn auth_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn ttl(duration: chrono::Duration) -> Duration {
    Duration::seconds(duration.num_seconds())
}

/// Build a httpOnly cookie for the access token.
pub fn access_cookie(token: &str, tokens: &TokenConfig, secure: bool) -> Cookie<'static> {
    auth_cookie(ACCESS_COOKIE, token.to_string(), ttl(tokens.access_ttl()), secure)
}

/// Build a httpOnly cookie for the refresh token.
pub fn refresh_cookie(token: &str, tokens: &TokenConfig, secure: bool) -> Cookie<'static> {
    auth_cookie(REFRESH_COOKIE, token.to_string(), ttl(tokens.refresh_ttl()), secure)
}

/// Set both auth cookies from a fresh pair.
pub fn with_token_pair(
    jar: CookieJar,
    pair: &TokenPair,
    tokens: &TokenConfig,
    secure: bool,
) -> CookieJar {
    jar.add(access_cookie(&pair.access_token, tokens, secure))
        .add(refresh_cookie(&pair.refresh_token, tokens, secure))
}

/// Expire both auth cookies.
pub fn cleared(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(auth_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure))
        .add(auth_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure))
}

/// Read a cookie value, treating an empty (cleared) cookie as absent.
pub fn value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|c| c.value()).filter(|v| !v.is_empty())
}
