//! Reply repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{
    fetch_connection, is_foreign_key_violation, parse_local_id, PageQuery, REPLY_COLUMNS,
};
use crate::error::{ApiError, ApiResult};
use crate::models::Reply;
use crate::relay::{Connection, ConnectionArgs, NodeFetcher};

/// Repository for reply database operations
#[derive(Clone)]
pub struct ReplyRepository {
    pool: PgPool,
}

impl ReplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, reply_id: Uuid) -> ApiResult<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>(&format!(
            "SELECT {REPLY_COLUMNS} FROM replies WHERE id = $1"
        ))
        .bind(reply_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reply)
    }

    /// Reply to a comment
    ///
    /// # Errors
    /// * `ApiError::NotFound` - If the comment does not exist
    pub async fn create(&self, comment_id: Uuid, author_id: Uuid, content: &str) -> ApiResult<Reply> {
        let result = sqlx::query_as::<_, Reply>(&format!(
            "INSERT INTO replies (comment_id, author_id, content) \
             VALUES ($1, $2, $3) RETURNING {REPLY_COLUMNS}"
        ))
        .bind(comment_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(reply) => {
                tracing::debug!(reply_id = %reply.id, comment_id = %comment_id, "Reply created");
                Ok(reply)
            }
            Err(err) if is_foreign_key_violation(&err) => {
                Err(ApiError::not_found("Comment", comment_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replies to a comment, oldest first
    pub async fn by_comment(&self, comment_id: Uuid, args: &ConnectionArgs) -> ApiResult<Connection<Reply>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM replies WHERE comment_id = $1".to_string(),
                page_sql: format!(
                    "SELECT {REPLY_COLUMNS} FROM replies \
                     WHERE comment_id = $1 \
                     ORDER BY created_at ASC, id ASC \
                     LIMIT $2 OFFSET $3"
                ),
                parent_id: Some(comment_id),
            },
            args,
        )
        .await
    }
}

#[async_trait]
impl NodeFetcher<Reply> for ReplyRepository {
    async fn fetch_by_local_id(&self, local_id: &str) -> ApiResult<Option<Reply>> {
        match parse_local_id(local_id) {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
