//! Agora API library
//!
//! This module exposes the core API components for use by the server binary,
//! integration tests, and as a library.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod relay;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use relay::{GlobalId, NodeKind, NodeRegistry};
pub use services::{AuthService, Session, SessionResolver, TokenCodec};
