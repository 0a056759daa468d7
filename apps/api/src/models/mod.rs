//! Database models for Agora
//!
//! Row types for the four node types of the social graph. Each row's `id` is
//! assigned by the database on insert and never changes.

pub mod comment;
pub mod post;
pub mod reply;
pub mod user;

pub use comment::Comment;
pub use post::Post;
pub use reply::Reply;
pub use user::User;
