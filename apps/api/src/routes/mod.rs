//! HTTP route handlers for the Agora API

pub mod graphql;

pub use graphql::{graphql_router, GraphQLState};
