//! DataLoader implementations for GraphQL
//!
//! Relation fields on posts, comments and replies resolve through these
//! loaders, so a page of N nodes costs one query per relation instead of N.

mod like_count;
mod user;
mod viewer_like;

pub use like_count::LikeCountLoader;
pub use user::UserLoader;
pub use viewer_like::{LikeKey, ViewerLikeLoader};
