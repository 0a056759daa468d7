//! Error handling for the Agora API
//!
//! This module provides the unified error type using thiserror. Errors raised
//! while resolving a GraphQL field are converted with
//! [`ApiError::into_field_error`], which keeps the failure scoped to that
//! field and attaches a machine-readable `code` extension.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::relay::{ConnectionError, DecodeError, NodeError};

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication & Authorization ==========
    /// No authenticated user on the session
    #[error("authentication required")]
    Unauthorized,

    /// Email/password pair rejected
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Invalid token (expired, malformed, revoked)
    #[error("invalid authentication token: {0}")]
    InvalidToken(String),

    /// User lacks permission for the requested operation
    #[error("insufficient permissions: {0}")]
    Forbidden(String),

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    // ========== Client Input Errors ==========
    /// Malformed global id or cursor
    #[error("decode error: {0}")]
    Decode(String),

    /// Global id decodes but names a type with no registered fetcher
    #[error("unknown node type: {0}")]
    UnknownType(String),

    /// Invalid pagination or field argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Infrastructure Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JWT encoding error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Decode(_) => "DECODE_ERROR",
            Self::UnknownType(_) => "UNKNOWN_TYPE",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Jwt(_) => "JWT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error indicates a server-side fault rather than bad input
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Jwt(_) | Self::Configuration(_) | Self::Internal(_)
        )
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Log the error with appropriate severity
    pub fn log(&self) {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code, "Server error occurred");
        } else if matches!(self, Self::UnknownType(_)) {
            // Ids only decode to unregistered types when a fetcher is missing
            tracing::warn!(error = %self, code, "Node type has no registered fetcher");
        } else if matches!(
            self,
            Self::Unauthorized | Self::InvalidCredentials | Self::Forbidden(_)
        ) {
            tracing::warn!(error = %self, code, "Authorization error");
        } else {
            tracing::debug!(error = %self, code, "Client error");
        }
    }

    /// Log and convert into a GraphQL field error
    pub fn into_field_error(self) -> async_graphql::Error {
        self.log();
        self.extend()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.error_code());
        })
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ConnectionError> for ApiError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::InvalidArgument { .. } => Self::InvalidArgument(err.to_string()),
            ConnectionError::Decode { .. } => Self::Decode(err.to_string()),
        }
    }
}

impl From<NodeError> for ApiError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Decode(e) => e.into(),
            NodeError::UnknownType(name) => Self::UnknownType(name),
            NodeError::KindMismatch { .. } => Self::InvalidArgument(err.to_string()),
            NodeError::InvalidLocalId(_) => Self::Decode(err.to_string()),
            NodeError::Store(e) => e,
        }
    }
}

/// Batched loads share one error between every waiting key
impl From<Arc<sqlx::Error>> for ApiError {
    fn from(err: Arc<sqlx::Error>) -> Self {
        match Arc::try_unwrap(err) {
            Ok(err) => Self::Database(err),
            Err(shared) => Self::Internal(format!("database error: {shared}")),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ApiError first
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}
