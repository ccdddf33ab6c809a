//! Account flows: registration, profile lookup and profile/password changes.

use tracing::info;
use uuid::Uuid;

use super::AuthError;
use super::password::{PasswordHash, verify_password};
use crate::models::auth::{Identity, NewIdentity, normalize_handle};
use crate::store::IdentityStore;

/// Register a new identity. The password is hashed before first persistence.
pub async fn register(
    store: &dyn IdentityStore,
    new: NewIdentity,
) -> Result<Identity, AuthError> {
    let identity = store.insert(Identity::register(new)?).await?;
    info!(user_id = %identity.id, username = %identity.username, "user registered");
    Ok(identity)
}

/// Fetch the full identity behind an authenticated subject.
pub async fn current_identity(
    store: &dyn IdentityStore,
    identity_id: Uuid,
) -> Result<Identity, AuthError> {
    store
        .find_by_id(identity_id)
        .await?
        .ok_or(AuthError::IdentityNotFound)
}

/// Replace the password after checking the current one.
///
/// The refresh slot is left as is; existing sessions stay live.
pub async fn change_password(
    store: &dyn IdentityStore,
    identity_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    if old_password.is_empty() || new_password.is_empty() {
        return Err(AuthError::ValidationError(
            "Both old and new passwords are required".into(),
        ));
    }
    let identity = current_identity(store, identity_id).await?;
    if !verify_password(old_password, &identity.password_hash)? {
        return Err(AuthError::ValidationError("Invalid old password".into()));
    }
    store
        .update_password(identity_id, &PasswordHash::new(new_password)?)
        .await?;
    info!(user_id = %identity_id, "password changed");
    Ok(())
}

/// Update display name and email. The password hash is not touched.
pub async fn update_account(
    store: &dyn IdentityStore,
    identity_id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Identity, AuthError> {
    let full_name = full_name.trim();
    let email = normalize_handle(email);
    if full_name.is_empty() || email.is_empty() {
        return Err(AuthError::ValidationError("All fields are required".into()));
    }
    store.update_account(identity_id, full_name, &email).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::ana;
    use crate::store::MemoryIdentityStore;

    #[tokio::test]
    async fn register_then_duplicate_conflicts() {
        let store = MemoryIdentityStore::new();
        register(&store, ana()).await.unwrap();

        let mut shouting = ana();
        shouting.username = "ANA".into();
        shouting.email = "fresh@x.com".into();
        let err = register(&store, shouting).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn change_password_requires_old_password() {
        let store = MemoryIdentityStore::new();
        let ana = register(&store, ana()).await.unwrap();

        let err = change_password(&store, ana.id, "wrong", "n3w-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));

        change_password(&store, ana.id, "p@ss1234", "n3w-pass")
            .await
            .unwrap();
        let stored = current_identity(&store, ana.id).await.unwrap();
        assert!(verify_password("n3w-pass", &stored.password_hash).unwrap());
        assert!(!verify_password("p@ss1234", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn change_password_keeps_session_slot() {
        let store = MemoryIdentityStore::new();
        let ana = register(&store, ana()).await.unwrap();
        store.persist_refresh(ana.id, "r1").await.unwrap();

        change_password(&store, ana.id, "p@ss1234", "n3w-pass")
            .await
            .unwrap();
        assert_eq!(store.current_refresh(ana.id).await.unwrap().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn update_account_normalizes_email_and_keeps_hash() {
        let store = MemoryIdentityStore::new();
        let ana = register(&store, ana()).await.unwrap();

        let updated = update_account(&store, ana.id, " Ana Lima ", "Ana@New.com")
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Ana Lima");
        assert_eq!(updated.email, "ana@new.com");
        assert_eq!(updated.password_hash, ana.password_hash);
    }

    #[tokio::test]
    async fn update_account_requires_both_fields() {
        let store = MemoryIdentityStore::new();
        let ana = register(&store, ana()).await.unwrap();
        let err = update_account(&store, ana.id, "", "ana@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }

    #[tokio::test]
    async fn current_identity_for_unknown_id() {
        let store = MemoryIdentityStore::new();
        let err = current_identity(&store, Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));
    }
}
