//! Reply GraphQL type

use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};

use super::connection::connection_type;
use super::relations::{author, like_count, viewer_has_liked};
use super::user::User;
use crate::models::Reply as DbReply;
use crate::relay::NodeKind;

pub struct Reply {
    inner: DbReply,
}

impl Reply {
    pub fn new(reply: DbReply) -> Self {
        Self { inner: reply }
    }
}

impl From<DbReply> for Reply {
    fn from(reply: DbReply) -> Self {
        Self::new(reply)
    }
}

connection_type!(ReplyConnection, ReplyEdge, Reply, DbReply);

#[Object]
impl Reply {
    pub(crate) async fn id(&self) -> ID {
        ID(NodeKind::Reply.global_id(self.inner.id))
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
        like_count(ctx, NodeKind::Reply, self.inner.id).await
    }

    async fn viewer_has_liked(&self, ctx: &Context<'_>) -> Result<bool> {
        viewer_has_liked(ctx, NodeKind::Reply, self.inner.id).await
    }
}
