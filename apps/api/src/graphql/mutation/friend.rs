//! Friendship mutations

use async_graphql::{Context, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::context::{field_error, require_viewer};
use crate::graphql::types::User;
use crate::relay::NodeKind;
use crate::repositories::UserRepository;

#[derive(Default)]
pub struct FriendMutation;

#[Object]
impl FriendMutation {
    /// Become friends with another user; returns that user
    async fn add_friend(&self, ctx: &Context<'_>, user_id: ID) -> Result<User> {
        let viewer = require_viewer(ctx)?;
        let friend_id = NodeKind::User.decode_local_id(&user_id).map_err(field_error)?;
        let repo = ctx.data::<UserRepository>()?;

        repo.add_friend(viewer.id, friend_id)
            .await
            .map_err(field_error)?;

        let friend = repo
            .find_by_id(friend_id)
            .await
            .map_err(field_error)?
            .ok_or_else(|| field_error(ApiError::not_found("User", friend_id.to_string())))?;
        Ok(friend.into())
    }
}
