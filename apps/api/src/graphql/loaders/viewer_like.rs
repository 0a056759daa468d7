//! Viewer-liked DataLoader for batched fetching
//!
//! Answers "has this user liked this node" for a whole page at once. The
//! user is part of the key, so one loader serves every request.

use async_graphql::dataloader::Loader;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::relay::NodeKind;

/// Key of a single like: (user id, node kind, node local id)
pub type LikeKey = (Uuid, NodeKind, Uuid);

/// DataLoader for batching viewer-liked checks
#[derive(Clone)]
pub struct ViewerLikeLoader {
    pool: PgPool,
}

impl ViewerLikeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Loader<LikeKey> for ViewerLikeLoader {
    type Value = bool;
    type Error = Arc<sqlx::Error>;

    async fn load(&self, keys: &[LikeKey]) -> Result<HashMap<LikeKey, Self::Value>, Self::Error> {
        let users: Vec<Uuid> = keys.iter().map(|(user, _, _)| *user).collect();
        let kinds: Vec<&str> = keys.iter().map(|(_, kind, _)| kind.type_name()).collect();
        let ids: Vec<Uuid> = keys.iter().map(|(_, _, id)| *id).collect();

        let rows: Vec<(Uuid, String, Uuid)> = sqlx::query_as(
            r#"
            SELECT l.user_id, l.node_kind, l.node_id
            FROM likes l
            JOIN UNNEST($1::uuid[], $2::text[], $3::uuid[]) AS k(user_id, node_kind, node_id)
              ON l.user_id = k.user_id AND l.node_kind = k.node_kind AND l.node_id = k.node_id
            "#,
        )
        .bind(&users)
        .bind(&kinds)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Arc::new)?;

        let mut result: HashMap<LikeKey, bool> = keys.iter().map(|key| (*key, false)).collect();
        for (user, kind, id) in rows {
            if let Some(kind) = NodeKind::from_type_name(&kind) {
                result.insert((user, kind, id), true);
            }
        }

        Ok(result)
    }
}
