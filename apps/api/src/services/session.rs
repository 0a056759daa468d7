//! Request-scoped sessions
//!
//! [`SessionResolver`] turns the raw `Authorization` header of a request into
//! a [`Session`]. Authentication failures never abort the request: a missing,
//! malformed, expired or revoked token, or a subject that no longer exists,
//! all yield an anonymous session. Fields that need a user enforce it
//! individually through [`Session::require_user`].

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::token::{token_fingerprint, TokenCodec};
use crate::error::{ApiError, ApiResult};
use crate::models::User;

/// Authenticated identity of one request
///
/// Created before any resolver runs and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The authenticated user, or `None` for anonymous requests
    pub user: Option<User>,
    /// The bearer token that authenticated this session
    pub raw_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, raw_token: String) -> Self {
        Self {
            user: Some(user),
            raw_token: Some(raw_token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|user| user.id)
    }

    /// The current user, or [`ApiError::Unauthorized`] for anonymous sessions
    pub fn require_user(&self) -> ApiResult<&User> {
        self.user.as_ref().ok_or(ApiError::Unauthorized)
    }
}

/// Read access to subjects and their active-token lists
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up the subject of a token
    async fn find_subject(&self, user_id: Uuid) -> ApiResult<Option<User>>;

    /// Whether the token with `fingerprint` is in the subject's active list
    async fn is_token_active(&self, user_id: Uuid, fingerprint: &str) -> ApiResult<bool>;
}

/// Extract the token from an `Authorization` header value
///
/// Accepts `<scheme> <token>` with any scheme, or a bare token. Values with
/// more than two whitespace-separated parts are rejected.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let first = parts.next()?;
    match (parts.next(), parts.next()) {
        (None, _) => Some(first),
        (Some(token), None) => Some(token),
        (Some(_), Some(_)) => None,
    }
}

/// Builds the [`Session`] for each request
#[derive(Clone)]
pub struct SessionResolver {
    codec: TokenCodec,
    store: Arc<dyn SessionStore>,
}

impl SessionResolver {
    pub fn new(codec: TokenCodec, store: Arc<dyn SessionStore>) -> Self {
        Self { codec, store }
    }

    /// Resolve the session for a raw `Authorization` header value
    pub async fn resolve(&self, raw_header: Option<&str>) -> Session {
        let Some(token) = raw_header.and_then(extract_token) else {
            return Session::anonymous();
        };

        let subject_id = match self.codec.verify_token(token) {
            Ok(subject_id) => subject_id,
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected, continuing anonymously");
                return Session::anonymous();
            }
        };

        match self
            .store
            .is_token_active(subject_id, &token_fingerprint(token))
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = %subject_id, "Session token revoked");
                return Session::anonymous();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Active token lookup failed");
                return Session::anonymous();
            }
        }

        match self.store.find_subject(subject_id).await {
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.id, "Request authenticated");
                Session::authenticated(user, token.to_string())
            }
            Ok(None) => {
                tracing::debug!(user_id = %subject_id, "Session subject no longer exists");
                Session::anonymous()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session subject lookup failed");
                Session::anonymous()
            }
        }
    }
}
