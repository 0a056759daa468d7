//! Relay `Node` interface

use async_graphql::{Interface, ID};

use super::{Comment, Post, Reply, User};
use crate::relay;

/// An object with a global id, fetchable through `Query.node`
#[derive(Interface)]
#[graphql(field(name = "id", ty = "ID"))]
pub enum Node {
    User(User),
    Post(Post),
    Comment(Comment),
    Reply(Reply),
}

impl From<relay::Node> for Node {
    fn from(node: relay::Node) -> Self {
        match node {
            relay::Node::User(user) => Self::User(user.into()),
            relay::Node::Post(post) => Self::Post(post.into()),
            relay::Node::Comment(comment) => Self::Comment(comment.into()),
            relay::Node::Reply(reply) => Self::Reply(reply.into()),
        }
    }
}
