//! Global object lookup

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::context::field_error;
use crate::graphql::types::Node;
use crate::relay::NodeRegistry;

#[derive(Default)]
pub struct NodeQuery;

#[Object]
impl NodeQuery {
    /// Fetch any object by its global id
    ///
    /// Returns null when the object no longer exists. Malformed ids and ids
    /// of unknown types are field errors.
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Node>> {
        let registry = ctx.data::<NodeRegistry>()?;
        let node = registry.resolve_node(&id).await.map_err(field_error)?;
        Ok(node.map(Node::from))
    }
}
