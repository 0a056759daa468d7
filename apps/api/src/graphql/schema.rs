//! GraphQL schema builder for Agora
//!
//! This module provides the schema construction for the async-graphql API.
//! The per-request [`Session`](crate::services::Session) is not schema data;
//! the transport attaches it to each request.

use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::relay::NodeRegistry;
use crate::repositories::{
    CommentRepository, LikeRepository, PostRepository, ReplyRepository, UserRepository,
};
use crate::services::AuthService;

use super::loaders::{LikeCountLoader, UserLoader, ViewerLikeLoader};
use super::mutation::Mutation;
use super::query::Query;

/// The Agora GraphQL schema type
pub type AgoraSchema = Schema<Query, Mutation, EmptySubscription>;

/// Build the node registry with every repository-backed fetcher
pub fn default_registry(pool: &PgPool) -> NodeRegistry {
    NodeRegistry::new()
        .register_users(Arc::new(UserRepository::new(pool.clone())))
        .register_posts(Arc::new(PostRepository::new(pool.clone())))
        .register_comments(Arc::new(CommentRepository::new(pool.clone())))
        .register_replies(Arc::new(ReplyRepository::new(pool.clone())))
}

/// Builder for constructing the GraphQL schema with required services
pub struct SchemaBuilder {
    pool: Option<PgPool>,
    auth_service: Option<AuthService>,
    registry: Option<NodeRegistry>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            pool: None,
            auth_service: None,
            registry: None,
        }
    }

    /// Set the database pool
    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Set the auth service
    pub fn auth_service(mut self, auth_service: AuthService) -> Self {
        self.auth_service = Some(auth_service);
        self
    }

    /// Override the node registry
    ///
    /// Defaults to [`default_registry`] over the configured pool.
    pub fn registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the schema with all configured services
    ///
    /// # Errors
    /// Returns `ApiError::Configuration` if the pool or auth service is missing
    pub fn build(self) -> ApiResult<AgoraSchema> {
        let pool = self.pool.ok_or_else(|| {
            ApiError::Configuration("database pool is required".to_string())
        })?;
        let auth_service = self.auth_service.ok_or_else(|| {
            ApiError::Configuration("auth service is required".to_string())
        })?;
        let registry = self.registry.unwrap_or_else(|| default_registry(&pool));

        let schema = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(registry)
            .data(auth_service)
            .data(UserRepository::new(pool.clone()))
            .data(PostRepository::new(pool.clone()))
            .data(CommentRepository::new(pool.clone()))
            .data(ReplyRepository::new(pool.clone()))
            .data(LikeRepository::new(pool.clone()))
            .data(DataLoader::new(UserLoader::new(pool.clone()), tokio::spawn))
            .data(DataLoader::new(LikeCountLoader::new(pool.clone()), tokio::spawn))
            .data(DataLoader::new(ViewerLikeLoader::new(pool.clone()), tokio::spawn))
            .data(pool)
            .finish();

        Ok(schema)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new GraphQL schema over the database with the default registry
pub fn build_schema(pool: PgPool, auth_service: AuthService) -> ApiResult<AgoraSchema> {
    SchemaBuilder::new()
        .pool(pool)
        .auth_service(auth_service)
        .build()
}
