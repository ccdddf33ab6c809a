//! JWT token generation and verification.
//!
//! Access and refresh tokens carry the same claims but are signed with
//! distinct secrets, so one can never be presented in place of the other.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::{Identity, TokenClaims, TokenPair};
use crate::uuid::token_id;

/// Signing secrets and lifetimes for both token kinds.
///
/// Built once at startup; a missing secret or inverted lifetimes is a fatal
/// configuration error rather than a per-request one.
#[derive(Clone)]
pub struct TokenConfig {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();
        if access_secret.is_empty() {
            return Err(AuthError::Config("access token secret is not set".into()));
        }
        if refresh_secret.is_empty() {
            return Err(AuthError::Config("refresh token secret is not set".into()));
        }
        if access_secret == refresh_secret {
            return Err(AuthError::Config(
                "access and refresh token secrets must differ".into(),
            ));
        }
        if access_ttl <= Duration::zero() {
            return Err(AuthError::Config("access token expiry must be positive".into()));
        }
        if refresh_ttl < access_ttl {
            return Err(AuthError::Config(
                "refresh token expiry must not be shorter than access token expiry".into(),
            ));
        }
        // Expiry timestamps are computed per request; they must stay representable.
        if Utc::now().checked_add_signed(refresh_ttl).is_none() {
            return Err(AuthError::Config("token expiry is too large".into()));
        }
        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Parse a token lifetime such as `15m`, `12h`, `10d` or `900` (seconds).
pub fn parse_ttl(value: &str) -> Result<Duration, AuthError> {
    let value = value.trim();
    let invalid = || AuthError::Config(format!("invalid token expiry: {value:?}"));
    let (digits, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], c),
        Some(_) => (value, 's'),
        None => return Err(invalid()),
    };
    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }
    let ttl = match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => None,
    };
    ttl.ok_or_else(invalid)
}

fn sign(
    identity: &Identity,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal("token expiry overflows".into()))?;
    let claims = TokenClaims {
        sub: identity.id,
        email: identity.email.clone(),
        username: identity.username.clone(),
        full_name: identity.full_name.clone(),
        jti: token_id(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

fn verify(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::TokenInvalid)
}

/// Generate a signed access token (HS256) for `identity`.
pub fn issue_access_token(
    identity: &Identity,
    config: &TokenConfig,
) -> Result<String, AuthError> {
    sign(identity, &config.access_secret, config.access_ttl, Utc::now())
}

/// Generate a signed refresh token (HS256) for `identity`.
pub fn issue_refresh_token(
    identity: &Identity,
    config: &TokenConfig,
) -> Result<String, AuthError> {
    sign(identity, &config.refresh_secret, config.refresh_ttl, Utc::now())
}

/// Generate a refresh token as if minted at `now`.
#[cfg(test)]
pub(crate) fn issue_refresh_token_at(
    identity: &Identity,
    config: &TokenConfig,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    sign(identity, &config.refresh_secret, config.refresh_ttl, now)
}

/// Mint a fresh access/refresh pair. No I/O.
pub fn issue_token_pair(
    identity: &Identity,
    config: &TokenConfig,
) -> Result<TokenPair, AuthError> {
    Ok(TokenPair {
        access_token: issue_access_token(identity, config)?,
        refresh_token: issue_refresh_token(identity, config)?,
    })
}

/// Verify an access token offline: signature and expiry only.
pub fn verify_access_token(token: &str, config: &TokenConfig) -> Result<TokenClaims, AuthError> {
    verify(token, &config.access_secret)
}

/// Verify a refresh token's signature and expiry.
///
/// This does not consult the session slot; see [`super::session::rotate_refresh`].
pub fn verify_refresh_token(token: &str, config: &TokenConfig) -> Result<TokenClaims, AuthError> {
    verify(token, &config.refresh_secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{ana, test_config};

    fn identity() -> Identity {
        Identity::register(ana()).unwrap()
    }

    #[test]
    fn access_token_round_trips_identity() {
        let config = test_config();
        let identity = identity();
        let token = issue_access_token(&identity, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_access_token_is_invalid() {
        let config = test_config();
        let issued = Utc::now() - Duration::hours(1);
        let token = sign(
            &identity(),
            &config.access_secret,
            config.access_ttl,
            issued,
        )
        .unwrap();
        assert!(matches!(
            verify_access_token(&token, &config),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let config = test_config();
        let pair = issue_token_pair(&identity(), &config).unwrap();
        assert!(matches!(
            verify_access_token(&pair.refresh_token, &config),
            Err(AuthError::TokenInvalid)
        ));
        assert!(matches!(
            verify_refresh_token(&pair.access_token, &config),
            Err(AuthError::TokenInvalid)
        ));
        assert!(verify_refresh_token(&pair.refresh_token, &config).is_ok());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let config = test_config();
        let mut token = issue_access_token(&identity(), &config).unwrap();
        token.push('x');
        assert!(matches!(
            verify_access_token(&token, &config),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn tokens_minted_back_to_back_differ() {
        let config = test_config();
        let identity = identity();
        let a = issue_refresh_token(&identity, &config).unwrap();
        let b = issue_refresh_token(&identity, &config).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn config_rejects_missing_or_shared_secrets() {
        let ttl = Duration::minutes(5);
        assert!(matches!(
            TokenConfig::new("", "r", ttl, ttl),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            TokenConfig::new("a", "", ttl, ttl),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            TokenConfig::new("same", "same", ttl, ttl),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn config_rejects_refresh_shorter_than_access() {
        assert!(matches!(
            TokenConfig::new("a", "r", Duration::hours(2), Duration::hours(1)),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
    }

    #[test]
    fn parse_ttl_units() {
        assert_eq!(parse_ttl("900").unwrap(), Duration::seconds(900));
        assert_eq!(parse_ttl("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_ttl("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_ttl("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_ttl(" 10d ").unwrap(), Duration::days(10));
    }

    #[test]
    fn parse_ttl_rejects_out_of_range_amounts() {
        for huge in ["200000000000d", "9223372036854775807s", "99999999999999h"] {
            assert!(
                matches!(parse_ttl(huge), Err(AuthError::Config(_))),
                "{huge:?} should be rejected"
            );
        }
    }

    #[test]
    fn config_rejects_expiry_past_representable_dates() {
        let huge = parse_ttl("100000000d").unwrap();
        assert!(matches!(
            TokenConfig::new("a", "r", Duration::minutes(15), huge),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn signing_with_overflowing_expiry_is_an_error() {
        let result = sign(
            &identity(),
            "secret",
            Duration::days(100_000_000),
            Utc::now(),
        );
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn expired_refresh_token_is_invalid() {
        let config = test_config();
        let issued = Utc::now() - Duration::days(11);
        let token = issue_refresh_token_at(&identity(), &config, issued).unwrap();
        assert!(matches!(
            verify_refresh_token(&token, &config),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn parse_ttl_rejects_garbage() {
        for bad in ["", "d", "0m", "-5m", "5w", "ten"] {
            assert!(parse_ttl(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
