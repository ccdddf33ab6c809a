//! PostgreSQL identity store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{IdentityStore, duplicate_identity};
use crate::auth::AuthError;
use crate::auth::password::PasswordHash;
use crate::models::auth::Identity;

const IDENTITY_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, \
     password_hash, refresh_token, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    email: String,
    full_name: String,
    avatar: Option<String>,
    cover_image: Option<String>,
    password_hash: String,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            avatar: row.avatar,
            cover_image: row.cover_image,
            password_hash: PasswordHash::from_stored(row.password_hash),
            refresh_token: row.refresh_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map unique-constraint violations to `Conflict`.
fn write_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return duplicate_identity();
    }
    AuthError::DbError(e)
}

#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn insert(&self, identity: Identity) -> Result<Identity, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "INSERT INTO users \
             (id, username, email, full_name, avatar, cover_image, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(identity.id)
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.full_name)
        .bind(&identity.avatar)
        .bind(&identity.cover_image)
        .bind(identity.password_hash.as_str())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Identity::from))
    }

    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE username = $1 OR email = $2 LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Identity::from))
    }

    async fn persist_refresh(&self, id: Uuid, refresh_token: &str) -> Result<(), AuthError> {
        let result =
            sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(refresh_token)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::IdentityNotFound);
        }
        Ok(())
    }

    async fn clear_refresh(&self, id: Uuid) -> Result<(), AuthError> {
        let result =
            sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::IdentityNotFound);
        }
        Ok(())
    }

    async fn current_refresh(&self, id: Uuid) -> Result<Option<String>, AuthError> {
        let token = sqlx::query_scalar::<_, Option<String>>(
            "SELECT refresh_token FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token.flatten())
    }

    async fn update_password(&self, id: Uuid, hash: &PasswordHash) -> Result<(), AuthError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(hash.as_str())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::IdentityNotFound);
        }
        Ok(())
    }

    async fn update_account(
        &self,
        id: Uuid,
        full_name: &str,
        email: &str,
    ) -> Result<Identity, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "UPDATE users SET full_name = $2, email = $3, updated_at = now() \
             WHERE id = $1 RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(id)
        .bind(full_name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;
        row.map(Identity::from).ok_or(AuthError::IdentityNotFound)
    }
}
