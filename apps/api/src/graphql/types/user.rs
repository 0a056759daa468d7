//! User GraphQL type

use async_graphql::{Context, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};

use super::connection::connection_type;
use super::post::PostConnection;
use crate::graphql::context::{field_error, viewer};
use crate::models::User as DbUser;
use crate::relay::{ConnectionArgs, NodeKind};
use crate::repositories::{PostRepository, UserRepository};

/// A member of the network
pub struct User {
    inner: DbUser,
}

impl User {
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }

    pub fn into_inner(self) -> DbUser {
        self.inner
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

connection_type!(UserConnection, UserEdge, User, DbUser);

#[Object]
impl User {
    /// Global node id
    pub(crate) async fn id(&self) -> ID {
        ID(NodeKind::User.global_id(self.inner.id))
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Only visible to the user themself
    async fn email(&self, ctx: &Context<'_>) -> Option<&str> {
        match viewer(ctx) {
            Some(viewer) if viewer.id == self.inner.id => Some(&self.inner.email),
            _ => None,
        }
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    async fn friends(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<UserConnection> {
        let repo = ctx.data::<UserRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo
            .friends(self.inner.id, &args)
            .await
            .map_err(field_error)?;
        Ok(connection.into())
    }

    /// Posts written by this user, newest first
    async fn posts(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<PostConnection> {
        let repo = ctx.data::<PostRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo
            .by_author(self.inner.id, &args)
            .await
            .map_err(field_error)?;
        Ok(connection.into())
    }
}

/// Result of a successful login
#[derive(SimpleObject)]
pub struct AuthPayload {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}
