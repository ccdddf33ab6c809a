//! Password hashing via bcrypt.

use std::fmt;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// A salted bcrypt hash of an identity's password.
///
/// Plaintext only becomes a `PasswordHash` through [`PasswordHash::new`], which
/// the identity constructors call right before a new or changed secret is
/// persisted. Callers never hash explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a password with bcrypt (cost 10).
    pub(crate) fn new(password: &str) -> Result<Self, AuthError> {
        bcrypt::hash(password, BCRYPT_COST)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Verify a password against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash.as_str())
        .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}
