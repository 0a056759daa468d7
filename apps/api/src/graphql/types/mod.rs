//! GraphQL type definitions
//!
//! Each object type wraps its database row and resolves relations through
//! the loaders and repositories registered on the schema.

mod comment;
mod connection;
mod node;
mod post;
mod relations;
mod reply;
mod user;

pub use comment::{Comment, CommentConnection, CommentEdge};
pub use connection::PageInfoType;
pub use node::Node;
pub use post::{Post, PostConnection, PostEdge};
pub use reply::{Reply, ReplyConnection, ReplyEdge};
pub use user::{AuthPayload, User, UserConnection, UserEdge};
