//! GraphQL queries for Agora
//!
//! This module contains all query resolvers, organized by domain.

mod feed;
mod node;
mod user;

pub use feed::FeedQuery;
pub use node::NodeQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(NodeQuery, UserQuery, FeedQuery);
