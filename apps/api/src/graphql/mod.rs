//! GraphQL schema and resolvers for Agora
//!
//! This module contains the async-graphql schema including:
//! - The Relay `Node` interface and connection types
//! - DataLoaders that batch relation lookups across a page
//! - Query resolvers for node lookup, the viewer, the feed and users
//! - Mutation resolvers for authentication, posting, likes and friendships

pub mod context;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use schema::{build_schema, default_registry, AgoraSchema, SchemaBuilder};
