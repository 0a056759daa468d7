//! Authentication mutations for Agora GraphQL API
//!
//! - login: Verify credentials and start a session
//! - logout: End the current session's token
//! - logoutAll: End every session of the current user

use async_graphql::{Context, Object, Result};

use crate::error::ApiError;
use crate::graphql::context::{field_error, require_viewer, session};
use crate::graphql::types::{AuthPayload, User};
use crate::services::AuthService;

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Log in with email and password
    ///
    /// The returned token is prepended to the user's active-token list and
    /// is honoured until it expires or is logged out.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth = ctx.data::<AuthService>()?;
        let (user, token) = auth.login(&email, &password).await.map_err(field_error)?;

        Ok(AuthPayload {
            token: token.token,
            expires_at: token.expires_at,
            user: User::from(user),
        })
    }

    /// Revoke the token this request was authenticated with
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let auth = ctx.data::<AuthService>()?;
        let session = session(ctx).ok_or_else(|| field_error(ApiError::Unauthorized))?;
        auth.logout(session).await.map_err(field_error)?;
        Ok(true)
    }

    /// Revoke every token of the current user; returns how many were active
    async fn logout_all(&self, ctx: &Context<'_>) -> Result<u64> {
        let auth = ctx.data::<AuthService>()?;
        let viewer = require_viewer(ctx)?;
        auth.logout_all(viewer.id).await.map_err(field_error)
    }
}
