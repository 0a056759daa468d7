//! Post GraphQL type

use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};

use super::comment::CommentConnection;
use super::connection::connection_type;
use super::relations::{author, like_count, viewer_has_liked};
use super::user::User;
use crate::graphql::context::field_error;
use crate::models::Post as DbPost;
use crate::relay::{ConnectionArgs, NodeKind};
use crate::repositories::CommentRepository;

pub struct Post {
    inner: DbPost,
}

impl Post {
    pub fn new(post: DbPost) -> Self {
        Self { inner: post }
    }
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self::new(post)
    }
}

connection_type!(PostConnection, PostEdge, Post, DbPost);

#[Object]
impl Post {
    pub(crate) async fn id(&self) -> ID {
        ID(NodeKind::Post.global_id(self.inner.id))
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        author(ctx, self.inner.author_id).await
    }

    async fn content(&self) -> &str {
        &self.inner.content
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Number of likes
    async fn likes(&self, ctx: &Context<'_>) -> Result<i64> {
        like_count(ctx, NodeKind::Post, self.inner.id).await
    }

    async fn viewer_has_liked(&self, ctx: &Context<'_>) -> Result<bool> {
        viewer_has_liked(ctx, NodeKind::Post, self.inner.id).await
    }

    /// Comments, oldest first
    async fn comments(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<CommentConnection> {
        let repo = ctx.data::<CommentRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo
            .by_post(self.inner.id, &args)
            .await
            .map_err(field_error)?;
        Ok(connection.into())
    }
}
