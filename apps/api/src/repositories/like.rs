//! Like repository
//!
//! Likes are keyed by node type name and local id, so one table serves
//! posts, comments and replies. Reads are batched through the GraphQL
//! like loaders.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::relay::NodeKind;

/// Repository for like database operations
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Like a node; returns `false` if it was already liked
    pub async fn like(&self, user_id: Uuid, kind: NodeKind, node_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, node_kind, node_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, node_kind, node_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(kind.type_name())
        .bind(node_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a like; returns `false` if there was none
    pub async fn unlike(&self, user_id: Uuid, kind: NodeKind, node_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query(
            "DELETE FROM likes WHERE user_id = $1 AND node_kind = $2 AND node_id = $3",
        )
        .bind(user_id)
        .bind(kind.type_name())
        .bind(node_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
