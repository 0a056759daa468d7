//! Post repository
//!
//! Post creation, the global feed, and per-author listings.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{fetch_connection, parse_local_id, PageQuery, POST_COLUMNS};
use crate::error::ApiResult;
use crate::models::Post;
use crate::relay::{Connection, ConnectionArgs, NodeFetcher};

/// Repository for post database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, post_id: Uuid) -> ApiResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    /// Insert a new post authored by `author_id`
    pub async fn create(&self, author_id: Uuid, content: &str) -> ApiResult<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (author_id, content) VALUES ($1, $2) RETURNING {POST_COLUMNS}"
        ))
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Every post, newest first
    pub async fn feed(&self, args: &ConnectionArgs) -> ApiResult<Connection<Post>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM posts".to_string(),
                page_sql: format!(
                    "SELECT {POST_COLUMNS} FROM posts \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT $1 OFFSET $2"
                ),
                parent_id: None,
            },
            args,
        )
        .await
    }

    /// Posts written by one user, newest first
    pub async fn by_author(&self, author_id: Uuid, args: &ConnectionArgs) -> ApiResult<Connection<Post>> {
        fetch_connection(
            &self.pool,
            PageQuery {
                count_sql: "SELECT COUNT(*) FROM posts WHERE author_id = $1".to_string(),
                page_sql: format!(
                    "SELECT {POST_COLUMNS} FROM posts \
                     WHERE author_id = $1 \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT $2 OFFSET $3"
                ),
                parent_id: Some(author_id),
            },
            args,
        )
        .await
    }
}

#[async_trait]
impl NodeFetcher<Post> for PostRepository {
    async fn fetch_by_local_id(&self, local_id: &str) -> ApiResult<Option<Post>> {
        match parse_local_id(local_id) {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
