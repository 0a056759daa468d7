//! Comment model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a post
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: Uuid,

    /// Post this comment belongs to
    pub post_id: Uuid,

    /// User who wrote the comment
    pub author_id: Uuid,

    pub content: String,

    pub created_at: DateTime<Utc>,
}
