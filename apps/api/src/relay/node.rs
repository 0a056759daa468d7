//! Node registry
//!
//! Maps the type tag of a decoded global id to the fetcher that owns that
//! type. The set of node types is closed ([`NodeKind`]), so dispatch is a
//! single exhaustive match rather than an open-ended lookup table.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::global_id::{self, DecodeError, GlobalId};
use crate::error::ApiError;
use crate::models::{Comment, Post, Reply, User};

/// Every type reachable through `Query.node`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    User,
    Post,
    Comment,
    Reply,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [Self::User, Self::Post, Self::Comment, Self::Reply];

    /// GraphQL type name, also used as the tag inside global ids
    pub fn type_name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Post => "Post",
            Self::Comment => "Comment",
            Self::Reply => "Reply",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == type_name)
    }

    /// Encode a global id for an entity of this kind
    pub fn global_id(self, local_id: Uuid) -> String {
        global_id::encode(self.type_name(), &local_id.to_string())
    }

    /// Decode a global id that must refer to this kind and carry a UUID local id
    pub fn decode_local_id(self, id: &str) -> Result<Uuid, NodeError> {
        let decoded = global_id::decode(id)?;
        if decoded.type_name() != self.type_name() {
            return Err(NodeError::KindMismatch {
                expected: self,
                found: decoded.type_name().to_string(),
            });
        }
        Uuid::parse_str(decoded.local_id()).map_err(|_| NodeError::InvalidLocalId(decoded))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A resolved entity of any node type
#[derive(Debug, Clone)]
pub enum Node {
    User(User),
    Post(Post),
    Comment(Comment),
    Reply(Reply),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::User(_) => NodeKind::User,
            Self::Post(_) => NodeKind::Post,
            Self::Comment(_) => NodeKind::Comment,
            Self::Reply(_) => NodeKind::Reply,
        }
    }

    pub fn local_id(&self) -> Uuid {
        match self {
            Self::User(user) => user.id,
            Self::Post(post) => post.id,
            Self::Comment(comment) => comment.id,
            Self::Reply(reply) => reply.id,
        }
    }

    pub fn global_id(&self) -> String {
        self.kind().global_id(self.local_id())
    }
}

/// Node resolution failures
#[derive(Debug, Error)]
pub enum NodeError {
    /// The id is not a well-formed global id
    #[error("invalid global id: {0}")]
    Decode(#[from] DecodeError),

    /// The id decodes, but no fetcher handles its type name
    #[error("unknown node type: {0}")]
    UnknownType(String),

    /// The id refers to a different type than the field expects
    #[error("expected a {expected} id, got a {found} id")]
    KindMismatch { expected: NodeKind, found: String },

    /// The local id has the wrong format for its type
    #[error("invalid local id for {}: {}", .0.type_name(), .0.local_id())]
    InvalidLocalId(GlobalId),

    /// The backing store failed
    #[error(transparent)]
    Store(ApiError),
}

/// Retrieves one entity type by its store-local id
///
/// A missing entity is `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait NodeFetcher<T>: Send + Sync {
    async fn fetch_by_local_id(&self, local_id: &str) -> Result<Option<T>, ApiError>;
}

/// Dispatch table from node type to fetcher
///
/// Assembled once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    users: Option<Arc<dyn NodeFetcher<User>>>,
    posts: Option<Arc<dyn NodeFetcher<Post>>>,
    comments: Option<Arc<dyn NodeFetcher<Comment>>>,
    replies: Option<Arc<dyn NodeFetcher<Reply>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_users(mut self, fetcher: Arc<dyn NodeFetcher<User>>) -> Self {
        self.users = Some(fetcher);
        self
    }

    pub fn register_posts(mut self, fetcher: Arc<dyn NodeFetcher<Post>>) -> Self {
        self.posts = Some(fetcher);
        self
    }

    pub fn register_comments(mut self, fetcher: Arc<dyn NodeFetcher<Comment>>) -> Self {
        self.comments = Some(fetcher);
        self
    }

    pub fn register_replies(mut self, fetcher: Arc<dyn NodeFetcher<Reply>>) -> Self {
        self.replies = Some(fetcher);
        self
    }

    /// Whether a fetcher is registered for `kind`
    pub fn handles(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::User => self.users.is_some(),
            NodeKind::Post => self.posts.is_some(),
            NodeKind::Comment => self.comments.is_some(),
            NodeKind::Reply => self.replies.is_some(),
        }
    }

    /// Resolve a global id to its entity
    ///
    /// Returns `Ok(None)` when the entity no longer exists and
    /// [`NodeError::UnknownType`] when the type name has no fetcher.
    pub async fn resolve_node(&self, global_id: &str) -> Result<Option<Node>, NodeError> {
        let id = global_id::decode(global_id)?;
        let kind = NodeKind::from_type_name(id.type_name())
            .ok_or_else(|| NodeError::UnknownType(id.type_name().to_string()))?;

        let node = match kind {
            NodeKind::User => fetch(&self.users, kind, &id).await?.map(Node::User),
            NodeKind::Post => fetch(&self.posts, kind, &id).await?.map(Node::Post),
            NodeKind::Comment => fetch(&self.comments, kind, &id).await?.map(Node::Comment),
            NodeKind::Reply => fetch(&self.replies, kind, &id).await?.map(Node::Reply),
        };

        if node.is_none() {
            tracing::debug!(node_type = %kind, local_id = id.local_id(), "Node not found");
        }

        Ok(node)
    }

    /// Concrete GraphQL type name of a resolved node
    pub fn resolve_type_name_of(node: &Node) -> &'static str {
        node.kind().type_name()
    }
}

async fn fetch<T>(
    fetcher: &Option<Arc<dyn NodeFetcher<T>>>,
    kind: NodeKind,
    id: &GlobalId,
) -> Result<Option<T>, NodeError> {
    let fetcher = fetcher
        .as_ref()
        .ok_or_else(|| NodeError::UnknownType(kind.type_name().to_string()))?;
    fetcher
        .fetch_by_local_id(id.local_id())
        .await
        .map_err(NodeError::Store)
}
