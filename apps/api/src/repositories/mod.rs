//! Database repository layer for Agora
//!
//! Centralizes all SQL. Each node repository implements
//! [`NodeFetcher`](crate::relay::NodeFetcher) for its row type, and
//! [`SessionRepository`] implements the session and account stores used by
//! the auth services.

pub mod comment;
pub mod like;
pub mod post;
pub mod reply;
pub mod session;
pub mod user;
pub mod utils;

pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use reply::ReplyRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
