//! Authentication domain models.
//!
//! These are internal domain models; the HTTP layer has its own camelCase
//! request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::PasswordHash;
use crate::uuid::uuidv7;

/// An authenticated principal (user account).
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    /// Unique, lowercased handle.
    pub username: String,
    /// Unique, lowercased contact address.
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub password_hash: PasswordHash,
    /// The single live refresh token, if a session is active.
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Build a fresh identity from registration input.
    ///
    /// Normalizes the unique fields and hashes the password. This is the one
    /// place a new identity's secret is hashed before its first persistence.
    pub fn register(new: NewIdentity) -> Result<Self, AuthError> {
        let new = new.normalized()?;
        let password_hash = PasswordHash::new(&new.password)?;
        let now = Utc::now();
        Ok(Self {
            id: uuidv7(),
            username: new.username,
            email: new.email,
            full_name: new.full_name,
            avatar: new.avatar,
            cover_image: new.cover_image,
            password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// The identity without its secret or session slot.
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            avatar: self.avatar.clone(),
            cover_image: self.cover_image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Registration input, before validation and hashing.
#[derive(Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

impl NewIdentity {
    fn normalized(self) -> Result<Self, AuthError> {
        let required = [&self.full_name, &self.email, &self.username, &self.password];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AuthError::ValidationError("All fields are required".into()));
        }
        Ok(Self {
            username: normalize_handle(&self.username),
            email: normalize_handle(&self.email),
            full_name: self.full_name.trim().to_string(),
            password: self.password,
            avatar: non_blank(self.avatar),
            cover_image: non_blank(self.cover_image),
        })
    }
}

/// Trim and lowercase a unique lookup field (username or email).
pub fn normalize_handle(value: &str) -> String {
    value.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Identity as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject — identity id (standard JWT `sub` claim).
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// Unique token id, so two tokens minted in the same second differ.
    pub jti: Uuid,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
