//! Authentication service for Agora
//!
//! Ties the token codec to the store that owns each user's active-token list:
//! - Login: credential check, token issuance, then the explicit store write
//!   that prepends the new token to the subject's active list
//! - Logout: removes the current token from the active list
//! - Logout everywhere: clears the active list
//!
//! Password hashes are provisioned outside this service; only verification
//! happens here.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session::Session;
use super::token::{token_fingerprint, AuthToken, TokenCodec};
use crate::error::{ApiError, ApiResult};
use crate::models::User;

/// Account lookups and active-token list mutations
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    /// Add a token to the front of the user's active list
    async fn prepend_token(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        expires_at: DateTime<Utc>,
    ) -> ApiResult<()>;

    /// Remove one token from the user's active list
    async fn revoke_token(&self, user_id: Uuid, fingerprint: &str) -> ApiResult<bool>;

    /// Remove every token from the user's active list
    async fn revoke_all_tokens(&self, user_id: Uuid) -> ApiResult<u64>;
}

/// Authentication service providing login and logout
#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    store: Arc<dyn AccountStore>,
    argon2: Argon2<'static>,
    /// Verified against when the email is unknown so both paths cost the same
    dummy_password_hash: Option<String>,
}

impl AuthService {
    pub fn new(codec: TokenCodec, store: Arc<dyn AccountStore>) -> Self {
        let argon2 = Argon2::default();

        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"dummy_password_for_timing_attack_prevention", &dummy_salt)
            .map(|hash| hash.to_string())
            .ok();

        Self {
            codec,
            store,
            argon2,
            dummy_password_hash,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticate a user and start a new session
    ///
    /// # Errors
    /// - `ApiError::InvalidCredentials` if the email is unknown or the password is wrong
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(User, AuthToken)> {
        let user = self.store.find_by_email(email).await?;

        let (user, password_valid) = match user {
            Some(u) => {
                let valid = self.verify_password(password, &u.password_hash)?;
                (Some(u), valid)
            }
            None => {
                if let Some(dummy) = &self.dummy_password_hash {
                    let _ = self.verify_password(password, dummy);
                }
                (None, false)
            }
        };

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            (Some(_), false) => {
                tracing::warn!(email = %email, "Login failed: invalid password");
                return Err(ApiError::InvalidCredentials);
            }
            (None, _) => {
                tracing::warn!(email = %email, "Login failed: user not found");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let token = self.start_session(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    /// Issue a token for `user_id` and record it in the active list
    pub async fn start_session(&self, user_id: Uuid) -> ApiResult<AuthToken> {
        let token = self.codec.issue_token(user_id)?;
        self.store
            .prepend_token(user_id, &token_fingerprint(&token.token), token.expires_at)
            .await?;
        Ok(token)
    }

    /// End the session's current token
    ///
    /// The token stays usable for the remainder of the request that revoked it.
    pub async fn logout(&self, session: &Session) -> ApiResult<()> {
        let user = session.require_user()?;
        let token = session.raw_token.as_deref().ok_or(ApiError::Unauthorized)?;

        let removed = self
            .store
            .revoke_token(user.id, &token_fingerprint(token))
            .await?;
        if !removed {
            return Err(ApiError::InvalidToken("session is no longer active".to_string()));
        }

        tracing::info!(user_id = %user.id, "Session logged out");
        Ok(())
    }

    /// End every session of the user
    pub async fn logout_all(&self, user_id: Uuid) -> ApiResult<u64> {
        let count = self.store.revoke_all_tokens(user_id).await?;
        tracing::info!(user_id = %user_id, sessions_invalidated = count, "All sessions logged out");
        Ok(count)
    }

    /// Verify a password against an Argon2 hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
