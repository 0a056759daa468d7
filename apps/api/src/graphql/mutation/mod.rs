//! GraphQL mutations for Agora
//!
//! This module contains all mutation resolvers, organized by domain.
//! Everything except `login` requires an authenticated session.

mod auth;
mod content;
mod friend;
mod like;

pub use auth::AuthMutation;
pub use content::{ContentMutation, MAX_CONTENT_LENGTH};
pub use friend::FriendMutation;
pub use like::LikeMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(AuthMutation, ContentMutation, LikeMutation, FriendMutation);
