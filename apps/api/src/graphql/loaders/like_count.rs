//! Like-count DataLoader for batched fetching
//!
//! Counts likes for many nodes in one grouped query. Nodes without likes
//! still get an entry of zero.

use async_graphql::dataloader::Loader;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::relay::NodeKind;

/// DataLoader for batching like counts, keyed by node kind and local id
#[derive(Clone)]
pub struct LikeCountLoader {
    pool: PgPool,
}

impl LikeCountLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Loader<(NodeKind, Uuid)> for LikeCountLoader {
    type Value = i64;
    type Error = Arc<sqlx::Error>;

    async fn load(
        &self,
        keys: &[(NodeKind, Uuid)],
    ) -> Result<HashMap<(NodeKind, Uuid), Self::Value>, Self::Error> {
        let kinds: Vec<&str> = keys.iter().map(|(kind, _)| kind.type_name()).collect();
        let ids: Vec<Uuid> = keys.iter().map(|(_, id)| *id).collect();

        let rows: Vec<(String, Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT l.node_kind, l.node_id, COUNT(*)
            FROM likes l
            JOIN UNNEST($1::text[], $2::uuid[]) AS k(node_kind, node_id)
              ON l.node_kind = k.node_kind AND l.node_id = k.node_id
            GROUP BY l.node_kind, l.node_id
            "#,
        )
        .bind(&kinds)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Arc::new)?;

        let mut result: HashMap<(NodeKind, Uuid), i64> =
            keys.iter().map(|key| (*key, 0)).collect();
        for (kind, id, count) in rows {
            if let Some(kind) = NodeKind::from_type_name(&kind) {
                result.insert((kind, id), count);
            }
        }

        Ok(result)
    }
}
