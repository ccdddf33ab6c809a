//! Shared fixtures for auth unit tests.

use chrono::Duration;

use super::jwt::TokenConfig;
use crate::models::auth::NewIdentity;

pub(crate) fn test_config() -> TokenConfig {
    TokenConfig::new(
        "access-secret",
        "refresh-secret",
        Duration::minutes(15),
        Duration::days(10),
    )
    .unwrap()
}

pub(crate) fn ana() -> NewIdentity {
    NewIdentity {
        username: "ana".into(),
        email: "ana@x.com".into(),
        full_name: "Ana".into(),
        password: "p@ss1234".into(),
        avatar: None,
        cover_image: None,
    }
}
