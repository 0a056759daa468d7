//! Feed query

use async_graphql::{Context, Object, Result};

use crate::graphql::context::field_error;
use crate::graphql::types::PostConnection;
use crate::relay::ConnectionArgs;
use crate::repositories::PostRepository;

#[derive(Default)]
pub struct FeedQuery;

#[Object]
impl FeedQuery {
    /// Every post, newest first
    async fn feed(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Result<PostConnection> {
        let repo = ctx.data::<PostRepository>()?;
        let args = ConnectionArgs::new(first, after, last, before);
        let connection = repo.feed(&args).await.map_err(field_error)?;
        Ok(connection.into())
    }
}
