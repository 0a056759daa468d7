//! Session repository for the per-user active-token list
//!
//! Each row of `user_tokens` is one active token, stored as its SHA-256
//! fingerprint. Newer rows sort first. Removing a row revokes the token even
//! though its signature and expiry remain valid.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::USER_COLUMNS;
use crate::error::ApiResult;
use crate::models::User;
use crate::services::{AccountStore, SessionStore};

/// Repository for active-token database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new SessionRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fingerprints of a user's active tokens, most recent first
    pub async fn active_token_hashes(&self, user_id: Uuid) -> ApiResult<Vec<String>> {
        let hashes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT token_hash
            FROM user_tokens
            WHERE user_id = $1 AND expires_at > NOW()
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(hashes)
    }

    /// Delete expired tokens from the active lists
    ///
    /// Expired tokens already fail verification; this only keeps the table
    /// small. Called periodically from a background task.
    ///
    /// # Arguments
    /// * `batch_size` - Maximum number of rows to delete per call (prevents long locks)
    ///
    /// # Returns
    /// * `Ok(u64)` - The number of expired tokens that were deleted
    pub async fn delete_expired(&self, batch_size: i64) -> ApiResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_tokens
            WHERE id IN (
                SELECT id FROM user_tokens
                WHERE expires_at < NOW()
                LIMIT $1
            )
            "#,
        )
        .bind(batch_size)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find_subject(&self, user_id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn is_token_active(&self, user_id: Uuid, fingerprint: &str) -> ApiResult<bool> {
        let active = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_tokens
                WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW()
            )
            "#,
        )
        .bind(user_id)
        .bind(fingerprint)
        .fetch_one(&self.pool)
        .await?;
        Ok(active)
    }
}

#[async_trait]
impl AccountStore for SessionRepository {
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn prepend_token(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        expires_at: DateTime<Utc>,
    ) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(fingerprint)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn revoke_token(&self, user_id: Uuid, fingerprint: &str) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token_hash = $2")
            .bind(user_id)
            .bind(fingerprint)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_tokens(&self, user_id: Uuid) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
