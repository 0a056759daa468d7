//! Like mutations
//!
//! Posts, comments and replies can be liked. The id argument is any global
//! id; users are rejected.

use async_graphql::{Context, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::context::{field_error, require_viewer};
use crate::graphql::types::Node;
use crate::relay::{self, NodeKind, NodeRegistry};
use crate::repositories::LikeRepository;

/// Resolve a likeable node or fail
async fn likeable(ctx: &Context<'_>, id: &str) -> Result<relay::Node> {
    let registry = ctx.data::<NodeRegistry>()?;
    let node = registry
        .resolve_node(id)
        .await
        .map_err(field_error)?
        .ok_or_else(|| field_error(ApiError::not_found("Node", id)))?;

    if node.kind() == NodeKind::User {
        return Err(field_error(ApiError::InvalidArgument(
            "users cannot be liked".to_string(),
        )));
    }
    Ok(node)
}

#[derive(Default)]
pub struct LikeMutation;

#[Object]
impl LikeMutation {
    /// Like a post, comment or reply; liking twice is a no-op
    async fn like(&self, ctx: &Context<'_>, id: ID) -> Result<Node> {
        let viewer = require_viewer(ctx)?;
        let node = likeable(ctx, &id).await?;
        let repo = ctx.data::<LikeRepository>()?;

        if repo
            .like(viewer.id, node.kind(), node.local_id())
            .await
            .map_err(field_error)?
        {
            tracing::debug!(user_id = %viewer.id, node_id = %node.global_id(), "Node liked");
        }
        Ok(node.into())
    }

    /// Remove a like; unliking something not liked is a no-op
    async fn unlike(&self, ctx: &Context<'_>, id: ID) -> Result<Node> {
        let viewer = require_viewer(ctx)?;
        let node = likeable(ctx, &id).await?;
        let repo = ctx.data::<LikeRepository>()?;

        repo.unlike(viewer.id, node.kind(), node.local_id())
            .await
            .map_err(field_error)?;
        Ok(node.into())
    }
}
