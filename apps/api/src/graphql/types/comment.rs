//! Comment GraphQL type

use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};

use super::connection::connection_type;
use super::relations::{author, like_count, viewer_has_liked};
use super::reply::ReplyConnection;
use super::user::User;
use crate::graphql::context::field_error;
use crate::models::Comment as DbComment;
use crate::relay::{ConnectionArgs, NodeKind};
use crate::repositories::ReplyRepository;

pub struct Comment {
    inner: DbComment,
}

impl Comment {
    pub fn new(comment: DbComment) -> Self {
        Self { inner: comment }
    }
}

impl From<DbComment> for Comment {
    fn from(comment: DbComment) -> Self {
        Self::new(comment)
    }
}

connection_type!(CommentConnection, CommentEdge, Comment, DbComment);

#[Object]
impl Comment {
    pub(crate) async fn id(&self) -> ID {
        ID(NodeKind::Comment.global_id(self.inner.id))
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

    async fn likes(&self, ctx: &Context<'_>) -> Result<i64> {
        like_count(ctx, NodeKind::Comment, self.inner.id).await
    }

    async fn viewer_has_liked(&self, ctx: &Context<'_>) -> Result<bool> {
        viewer_has_liked(ctx, NodeKind::Comment, self.inner.id).await
    }

    async fn replies(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<ReplyConnection> {
        let repo = ctx.data::<ReplyRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo
            .by_comment(self.inner.id, &args)
            .await
            .map_err(field_error)?;
        Ok(connection.into())
    }
}
