//! Comment repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{
    fetch_connection, is_foreign_key_violation, parse_local_id, PageQuery, COMMENT_COLUMNS,
};
use crate::error::{ApiError, ApiResult};
use crate::models::Comment;
use crate::relay::{Connection, ConnectionArgs, NodeFetcher};

/// Repository for comment database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, comment_id: Uuid) -> ApiResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    /// Comment on a post
    ///
    /// # Errors
    /// * `ApiError::NotFound` - If the post does not exist
    pub async fn create(&self, post_id: Uuid, author_id: Uuid, content: &str) -> ApiResult<Comment> {
        let result = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (post_id, author_id, content) \
             VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(comment) => {
                tracing::debug!(comment_id = %comment.id, post_id = %post_id, "Comment created");
                Ok(comment)
            }
            Err(err) if is_foreign_key_violation(&err) => {
                Err(ApiError::not_found("Post", post_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Comments on a post, oldest first
    pub async fn by_post(&self, post_id: Uuid, args: &ConnectionArgs) -> ApiResult<Connection<Comment>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM comments WHERE post_id = $1".to_string(),
                page_sql: format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments \
                     WHERE post_id = $1 \
                     ORDER BY created_at ASC, id ASC \
                     LIMIT $2 OFFSET $3"
                ),
                parent_id: Some(post_id),
            },
            args,
        )
        .await
    }
}

#[async_trait]
impl NodeFetcher<Comment> for CommentRepository {
    async fn fetch_by_local_id(&self, local_id: &str) -> ApiResult<Option<Comment>> {
        match parse_local_id(local_id) {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
