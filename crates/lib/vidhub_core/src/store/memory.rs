//! In-process identity store, used by tests and `--in-memory` runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IdentityStore, duplicate_identity};
use crate::auth::AuthError;
use crate::auth::password::PasswordHash;
use crate::models::auth::Identity;

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn insert(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;
        let taken = identities
            .values()
            .any(|i| i.username == identity.username || i.email == identity.email);
        if taken || identities.contains_key(&identity.id) {
            return Err(duplicate_identity());
        }
        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError> {
        Ok(self.identities.read().await.get(&id).cloned())
    }

    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Identity>, AuthError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|i| {
                username.is_some_and(|u| i.username == u) || email.is_some_and(|e| i.email == e)
            })
            .cloned())
    }

    async fn persist_refresh(&self, id: Uuid, refresh_token: &str) -> Result<(), AuthError> {
        let mut identities = self.identities.write().await;
        let identity = identities.get_mut(&id).ok_or(AuthError::IdentityNotFound)?;
        identity.refresh_token = Some(refresh_token.to_string());
        identity.updated_at = Utc::now();
        Ok(())
    }

    async fn clear_refresh(&self, id: Uuid) -> Result<(), AuthError> {
        let mut identities = self.identities.write().await;
        let identity = identities.get_mut(&id).ok_or(AuthError::IdentityNotFound)?;
        identity.refresh_token = None;
        identity.updated_at = Utc::now();
        Ok(())
    }

    async fn current_refresh(&self, id: Uuid) -> Result<Option<String>, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .get(&id)
            .and_then(|i| i.refresh_token.clone()))
    }

    async fn update_password(&self, id: Uuid, hash: &PasswordHash) -> Result<(), AuthError> {
        let mut identities = self.identities.write().await;
        let identity = identities.get_mut(&id).ok_or(AuthError::IdentityNotFound)?;
        identity.password_hash = hash.clone();
        identity.updated_at = Utc::now();
        Ok(())
    }

    async fn update_account(
        &self,
        id: Uuid,
        full_name: &str,
        email: &str,
    ) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;
        if identities.values().any(|i| i.id != id && i.email == email) {
            return Err(duplicate_identity());
        }
        let identity = identities.get_mut(&id).ok_or(AuthError::IdentityNotFound)?;
        identity.full_name = full_name.to_string();
        identity.email = email.to_string();
        identity.updated_at = Utc::now();
        Ok(identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::ana;

    #[tokio::test]
    async fn insert_rejects_duplicate_username_or_email() {
        let store = MemoryIdentityStore::new();
        store.insert(Identity::register(ana()).unwrap()).await.unwrap();

        let mut same_email = ana();
        same_email.username = "other".into();
        let err = store
            .insert(Identity::register(same_email).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        let mut same_username = ana();
        same_username.email = "other@x.com".into();
        let err = store
            .insert(Identity::register(same_username).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_by_login_matches_either_field() {
        let store = MemoryIdentityStore::new();
        let ana = store.insert(Identity::register(ana()).unwrap()).await.unwrap();

        let by_name = store.find_by_login(Some("ana"), None).await.unwrap();
        assert_eq!(by_name.map(|i| i.id), Some(ana.id));
        let by_email = store.find_by_login(None, Some("ana@x.com")).await.unwrap();
        assert_eq!(by_email.map(|i| i.id), Some(ana.id));
        assert!(store.find_by_login(Some("bob"), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_slot_is_single_and_last_writer_wins() {
        let store = MemoryIdentityStore::new();
        let ana = store.insert(Identity::register(ana()).unwrap()).await.unwrap();

        store.persist_refresh(ana.id, "r1").await.unwrap();
        store.persist_refresh(ana.id, "r2").await.unwrap();
        assert_eq!(store.current_refresh(ana.id).await.unwrap().as_deref(), Some("r2"));

        store.clear_refresh(ana.id).await.unwrap();
        assert_eq!(store.current_refresh(ana.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn refresh_slot_write_leaves_password_untouched() {
        let store = MemoryIdentityStore::new();
        let ana = store.insert(Identity::register(ana()).unwrap()).await.unwrap();
        store.persist_refresh(ana.id, "r1").await.unwrap();
        let stored = store.find_by_id(ana.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, ana.password_hash);
    }

    #[tokio::test]
    async fn slot_writes_for_unknown_identity_fail() {
        let store = MemoryIdentityStore::new();
        let err = store.persist_refresh(Uuid::nil(), "r").await.unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));
        assert_eq!(store.current_refresh(Uuid::nil()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_account_rejects_taken_email() {
        let store = MemoryIdentityStore::new();
        let mut bob = ana();
        let ana = store.insert(Identity::register(ana()).unwrap()).await.unwrap();
        bob.username = "bob".into();
        bob.email = "bob@x.com".into();
        store.insert(Identity::register(bob).unwrap()).await.unwrap();

        let err = store
            .update_account(ana.id, "Ana", "bob@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        let updated = store
            .update_account(ana.id, "Ana Lima", "ana@y.com")
            .await
            .unwrap();
        assert_eq!(updated.email, "ana@y.com");
        assert_eq!(updated.full_name, "Ana Lima");
    }
}
