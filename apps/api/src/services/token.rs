//! Session token codec
//!
//! Issues and verifies signed, time-limited bearer tokens (HS256 JWTs).
//! Construction is pure: issuing a token does not record it anywhere. The
//! caller performs the store write that makes it part of the subject's
//! active-token list (see [`super::auth::AuthService::login`]).
//!
//! Verification checks signature, structure and expiry only. Revocation
//! (membership in the active-token list) is layered on top by
//! [`super::session::SessionResolver`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiResult;

/// Default session lifetime (30 minutes)
pub const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 60;

/// Token codec configuration, fixed at process start
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Session token TTL in seconds
    pub session_ttl_secs: i64,
    /// JWT issuer
    pub issuer: String,
    /// JWT audience
    pub audience: String,
}

impl TokenConfig {
    /// Create a TokenConfig with the default lifetime
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            issuer: "agora".to_string(),
            audience: "agora".to_string(),
        }
    }

    /// Create a TokenConfig from a lifetime string (e.g., "30m", "12h")
    ///
    /// Unparseable strings fall back to the default lifetime.
    pub fn with_lifetime_string(jwt_secret: String, lifetime: &str) -> Self {
        Self {
            session_ttl_secs: parse_duration_string(lifetime).unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ..Self::new(jwt_secret)
        }
    }
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
pub fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.is_ascii() {
        return None;
    }

    let (num_str, unit) = s.split_at(s.len() - 1);
    let num: i64 = num_str.parse().ok()?;
    if num <= 0 {
        return None;
    }

    match unit {
        "s" => Some(num),
        "m" => num.checked_mul(60),
        "h" => num.checked_mul(3600),
        "d" => num.checked_mul(24 * 3600),
        "w" => num.checked_mul(7 * 24 * 3600),
        _ => None,
    }
}

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Unique token ID; keeps tokens issued in the same second distinct
    pub jti: Uuid,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// A freshly issued, signed session token
#[derive(Debug, Clone)]
pub struct AuthToken {
    /// Encoded token handed to the client
    pub token: String,
    pub subject_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Token verification failures
///
/// Never surfaced to clients; the session resolver degrades both to an
/// anonymous session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Bad signature, wrong issuer/audience, or undecodable structure
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature valid but the token's lifetime has elapsed
    #[error("token expired")]
    Expired,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Session lifetime applied to every issued token
    pub fn session_lifetime(&self) -> Duration {
        Duration::seconds(self.config.session_ttl_secs)
    }

    /// Issue a token for `subject_id`, valid from now
    pub fn issue_token(&self, subject_id: Uuid) -> ApiResult<AuthToken> {
        self.issue_token_at(subject_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_token_at(&self, subject_id: Uuid, now: DateTime<Utc>) -> ApiResult<AuthToken> {
        let issued_at = timestamp_to_datetime(now.timestamp());
        let expires_at = issued_at + self.session_lifetime();

        let claims = Claims {
            sub: subject_id,
            jti: Uuid::new_v4(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(AuthToken {
            token,
            subject_id,
            issued_at,
            expires_at,
        })
    }

    /// Verify a raw token and return its subject
    pub fn verify_token(&self, raw: &str) -> Result<Uuid, VerifyError> {
        self.verify_token_at(raw, Utc::now()).map(|claims| claims.sub)
    }

    /// Verify a raw token against the time `now` and return its claims
    pub fn verify_token_at(&self, raw: &str, now: DateTime<Utc>) -> Result<Claims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now` so it can be tested deterministically
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let claims = decode::<Claims>(raw, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                VerifyError::Malformed(e.to_string())
            })?
            .claims;

        if now.timestamp() > claims.exp {
            tracing::debug!(user_id = %claims.sub, "Token expired");
            return Err(VerifyError::Expired);
        }

        Ok(claims)
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now)
}

/// Hash a token using SHA-256 for storage in the active-token list
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-for-unit-tests-minimum-32-chars";

    fn codec() -> TokenCodec {
        TokenCodec::new(TokenConfig::new(SECRET.to_string()))
    }

    #[test]
    fn test_parse_duration_string() {
        assert_eq!(parse_duration_string("30m"), Some(1800));
        assert_eq!(parse_duration_string("7d"), Some(604800));
        assert_eq!(parse_duration_string("24h"), Some(86400));
        assert_eq!(parse_duration_string("30s"), Some(30));
        assert_eq!(parse_duration_string("1w"), Some(604800));
        assert_eq!(parse_duration_string(""), None);
        assert_eq!(parse_duration_string("invalid"), None);
        assert_eq!(parse_duration_string("15x"), None);
        assert_eq!(parse_duration_string("-5m"), None);
        assert_eq!(parse_duration_string("5é"), None);
    }

    #[test]
    fn test_token_config_defaults() {
        let config = TokenConfig::new("secret".to_string());
        assert_eq!(config.session_ttl_secs, 30 * 60);
        assert_eq!(config.issuer, "agora");

        let config = TokenConfig::with_lifetime_string("secret".to_string(), "bogus");
        assert_eq!(config.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);

        let config = TokenConfig::with_lifetime_string("secret".to_string(), "2h");
        assert_eq!(config.session_ttl_secs, 7200);
    }

    #[test]
    fn test_round_trip_immediately_after_issuance() {
        let codec = codec();
        let subject = Uuid::new_v4();
        let token = codec.issue_token(subject).unwrap();

        assert_eq!(token.subject_id, subject);
        assert_eq!(token.expires_at - token.issued_at, Duration::minutes(30));
        assert_eq!(codec.verify_token(&token.token), Ok(subject));
    }

    #[test]
    fn test_expired_after_lifetime_elapses() {
        let codec = codec();
        let issued = Utc::now() - Duration::minutes(31);
        let token = codec.issue_token_at(Uuid::new_v4(), issued).unwrap();

        assert_eq!(codec.verify_token(&token.token), Err(VerifyError::Expired));
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec.issue_token_at(Uuid::new_v4(), issued).unwrap();

        assert!(codec.verify_token_at(&token.token, token.expires_at).is_ok());
        assert_eq!(
            codec.verify_token_at(&token.token, token.expires_at + Duration::seconds(1)),
            Err(VerifyError::Expired)
        );
    }

    #[test]
    fn test_tokens_issued_together_are_distinct() {
        let codec = codec();
        let subject = Uuid::new_v4();
        let now = Utc::now();
        let a = codec.issue_token_at(subject, now).unwrap();
        let b = codec.issue_token_at(subject, now).unwrap();
        assert_ne!(a.token, b.token);
        assert_ne!(token_fingerprint(&a.token), token_fingerprint(&b.token));
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let token = codec().issue_token(Uuid::new_v4()).unwrap();
        let other = TokenCodec::new(TokenConfig::new("another-secret-entirely".to_string()));
        assert!(matches!(
            other.verify_token(&token.token),
            Err(VerifyError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_malformed() {
        let mut config = TokenConfig::new(SECRET.to_string());
        config.issuer = "someone-else".to_string();
        let token = TokenCodec::new(config).issue_token(Uuid::new_v4()).unwrap();
        assert!(matches!(
            codec().verify_token(&token.token),
            Err(VerifyError::Malformed(_))
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec();
        for raw in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert!(matches!(
                codec.verify_token(raw),
                Err(VerifyError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_token_fingerprint() {
        let hash = token_fingerprint("test_token_123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, token_fingerprint("test_token_123"));
        assert_ne!(hash, token_fingerprint("different_token"));
    }
}
