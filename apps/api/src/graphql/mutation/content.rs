//! Posting mutations: posts, comments and replies

use async_graphql::{Context, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::context::{field_error, require_viewer};
use crate::graphql::types::{Comment, Post, Reply};
use crate::relay::NodeKind;
use crate::repositories::{CommentRepository, PostRepository, ReplyRepository};

/// Maximum length of post, comment and reply bodies, in characters
pub const MAX_CONTENT_LENGTH: usize = 5000;

/// Trim and validate a content body
fn validate_content(content: &str) -> Result<String, ApiError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::ValidationError("content must not be empty".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(content.to_string())
}

#[derive(Default)]
pub struct ContentMutation;

#[Object]
impl ContentMutation {
    async fn create_post(&self, ctx: &Context<'_>, content: String) -> Result<Post> {
        let viewer = require_viewer(ctx)?;
        let content = validate_content(&content).map_err(field_error)?;
        let repo = ctx.data::<PostRepository>()?;

        let post = repo.create(viewer.id, &content).await.map_err(field_error)?;
        Ok(post.into())
    }

    async fn create_comment(&self, ctx: &Context<'_>, post_id: ID, content: String) -> Result<Comment> {
        let viewer = require_viewer(ctx)?;
        let post_id = NodeKind::Post.decode_local_id(&post_id).map_err(field_error)?;
        let content = validate_content(&content).map_err(field_error)?;
        let repo = ctx.data::<CommentRepository>()?;

        let comment = repo
            .create(post_id, viewer.id, &content)
            .await
            .map_err(field_error)?;
        Ok(comment.into())
    }

    async fn create_reply(&self, ctx: &Context<'_>, comment_id: ID, content: String) -> Result<Reply> {
        let viewer = require_viewer(ctx)?;
        let comment_id = NodeKind::Comment
            .decode_local_id(&comment_id)
            .map_err(field_error)?;
        let content = validate_content(&content).map_err(field_error)?;
        let repo = ctx.data::<ReplyRepository>()?;

        let reply = repo
            .create(comment_id, viewer.id, &content)
            .await
            .map_err(field_error)?;
        Ok(reply.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_trims() {
        assert_eq!(validate_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_validate_content_rejects_blank() {
        let err = validate_content(" \n\t ").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validate_content_length_counts_chars() {
        let at_limit = "é".repeat(MAX_CONTENT_LENGTH);
        assert!(validate_content(&at_limit).is_ok());

        let over = "a".repeat(MAX_CONTENT_LENGTH + 1);
        assert!(validate_content(&over).is_err());
    }
}
