//! API server configuration.

use vidhub_core::auth::jwt::TokenConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    /// Token secrets and lifetimes.
    pub tokens: TokenConfig,
    /// Browser origin allowed to make credentialed requests. `None` allows any
    /// origin without credentials.
    pub cors_origin: Option<String>,
    /// Whether auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Configuration with secure cookies and no CORS origin.
    pub fn new(bind_addr: impl Into<String>, tokens: TokenConfig) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            tokens,
            cors_origin: None,
            cookie_secure: true,
        }
    }
}
