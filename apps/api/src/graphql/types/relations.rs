//! Relation lookups shared by posts, comments and replies
//!
//! Every lookup goes through a [`DataLoader`], so sibling nodes on one page
//! share a single query per relation.

use async_graphql::dataloader::DataLoader;
use async_graphql::{Context, Result};
use uuid::Uuid;

use crate::graphql::context::{field_error, viewer};
use crate::graphql::loaders::{LikeCountLoader, UserLoader, ViewerLikeLoader};
use crate::relay::NodeKind;

use super::user::User;

pub(crate) async fn like_count(ctx: &Context<'_>, kind: NodeKind, node_id: Uuid) -> Result<i64> {
    let loader = ctx.data::<DataLoader<LikeCountLoader>>()?;
    let count = loader.load_one((kind, node_id)).await.map_err(field_error)?;
    Ok(count.unwrap_or(0))
}

/// Anonymous viewers have never liked anything
pub(crate) async fn viewer_has_liked(
    ctx: &Context<'_>,
    kind: NodeKind,
    node_id: Uuid,
) -> Result<bool> {
    let Some(viewer) = viewer(ctx) else {
        return Ok(false);
    };
    let loader = ctx.data::<DataLoader<ViewerLikeLoader>>()?;
    let liked = loader
        .load_one((viewer.id, kind, node_id))
        .await
        .map_err(field_error)?;
    Ok(liked.unwrap_or(false))
}

/// Null when the author account no longer exists
pub(crate) async fn author(ctx: &Context<'_>, author_id: Uuid) -> Result<Option<User>> {
    let loader = ctx.data::<DataLoader<UserLoader>>()?;
    let user = loader.load_one(author_id).await.map_err(field_error)?;
    Ok(user.map(User::from))
}
