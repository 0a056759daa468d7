//! Request-context helpers shared by resolvers

use async_graphql::{Context, Result};

use crate::error::ApiError;
use crate::models::User as DbUser;
use crate::services::Session;

/// The session attached to this request, if any
pub fn session<'a>(ctx: &Context<'a>) -> Option<&'a Session> {
    ctx.data_opt::<Session>()
}

/// The authenticated user, or `None` for anonymous requests
pub fn viewer<'a>(ctx: &Context<'a>) -> Option<&'a DbUser> {
    session(ctx).and_then(|session| session.user.as_ref())
}

/// The authenticated user, or an `UNAUTHORIZED` field error
pub fn require_viewer<'a>(ctx: &Context<'a>) -> Result<&'a DbUser> {
    viewer(ctx).ok_or_else(|| ApiError::Unauthorized.into_field_error())
}

/// Convert any domain error into a field error
pub fn field_error(err: impl Into<ApiError>) -> async_graphql::Error {
    err.into().into_field_error()
}
