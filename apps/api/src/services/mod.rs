//! Business logic services for Agora
//!
//! - [`token`]: signing and verification of session tokens
//! - [`session`]: per-request session resolution from the `Authorization` header
//! - [`auth`]: login/logout and the active-token list

pub mod auth;
pub mod session;
pub mod token;

pub use auth::{AccountStore, AuthService};
pub use session::{Session, SessionResolver, SessionStore};
pub use token::{AuthToken, TokenCodec, TokenConfig, VerifyError};
