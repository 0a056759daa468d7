//! Reply model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A reply to a comment
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reply {
    pub id: Uuid,

    /// Comment this reply answers
    pub comment_id: Uuid,

    /// User who wrote the reply
    pub author_id: Uuid,

    pub content: String,

    pub created_at: DateTime<Utc>,
}
