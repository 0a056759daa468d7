//! User queries

use async_graphql::{Context, Object, Result};

use crate::graphql::context::{field_error, viewer};
use crate::graphql::types::{User, UserConnection};
use crate::relay::ConnectionArgs;
use crate::repositories::UserRepository;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated user, or null for anonymous requests
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        viewer(ctx).cloned().map(User::from)
    }

    /// All users, oldest account first
    async fn users(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<UserConnection> {
        let repo = ctx.data::<UserRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo.list(&args).await.map_err(field_error)?;
        Ok(connection.into())
    }
}
