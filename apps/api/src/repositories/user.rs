//! User repository for centralized database operations
//!
//! User lookups, the users and friends connections, and friendship writes.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{
    fetch_connection, is_foreign_key_violation, parse_local_id, PageQuery, USER_COLUMNS,
};
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::relay::{Connection, ConnectionArgs, NodeFetcher};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by their unique ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user with the given ID exists
    pub async fn find_by_id(&self, user_id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Find a user by their email address (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// All users, oldest account first
    pub async fn list(&self, args: &ConnectionArgs) -> ApiResult<Connection<User>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM users".to_string(),
                page_sql: format!(
                    "SELECT {USER_COLUMNS} FROM users \
                     ORDER BY created_at ASC, id ASC \
                     LIMIT $1 OFFSET $2"
                ),
                parent_id: None,
            },
            args,
        )
        .await
    }

    /// A user's friends, most recent friendship first
    pub async fn friends(&self, user_id: Uuid, args: &ConnectionArgs) -> ApiResult<Connection<User>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM friendships WHERE user_id = $1".to_string(),
                page_sql: format!(
                    "SELECT {} FROM friendships f \
                     JOIN users u ON u.id = f.friend_id \
                     WHERE f.user_id = $1 \
                     ORDER BY f.created_at DESC, u.id ASC \
                     LIMIT $2 OFFSET $3",
                    qualified_user_columns()
                ),
                parent_id: Some(user_id),
            },
            args,
        )
        .await
    }

    /// Record a mutual friendship
    ///
    /// Idempotent: returns `false` when the two users were already friends.
    pub async fn add_friend(&self, user_id: Uuid, friend_id: Uuid) -> ApiResult<bool> {
        if user_id == friend_id {
            return Err(ApiError::ValidationError(
                "cannot add yourself as a friend".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO friendships (user_id, friend_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT (user_id, friend_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await;

        let inserted = match result {
            Ok(done) => done.rows_affected(),
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(ApiError::not_found("User", friend_id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(inserted > 0)
    }
}

fn qualified_user_columns() -> String {
    USER_COLUMNS
        .split(',')
        .map(|column| format!("u.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl NodeFetcher<User> for UserRepository {
    async fn fetch_by_local_id(&self, local_id: &str) -> ApiResult<Option<User>> {
        match parse_local_id(local_id) {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
