//! Post model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A post from the posts table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: Uuid,

    /// User who wrote the post
    pub author_id: Uuid,

    pub content: String,

    pub created_at: DateTime<Utc>,
}
