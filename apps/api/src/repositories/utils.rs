//! Shared utility functions for repositories
//!
//! Column lists for each entity type and the helper that turns a counted,
//! ordered SQL query into a Relay connection.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::relay::{connection_from_slice, Connection, ConnectionArgs};

// ============================================================================
// SQL Column Constants
// ============================================================================

/// SQL columns for user queries
pub const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, created_at, updated_at
"#;

/// SQL columns for post queries
pub const POST_COLUMNS: &str = r#"
    id, author_id, content, created_at
"#;

/// SQL columns for comment queries
pub const COMMENT_COLUMNS: &str = r#"
    id, post_id, author_id, content, created_at
"#;

/// SQL columns for reply queries
pub const REPLY_COLUMNS: &str = r#"
    id, comment_id, author_id, content, created_at
"#;

/// A counted, ordered collection query
///
/// `count_sql` returns the collection size. `page_sql` returns rows in the
/// collection's canonical order and takes `LIMIT`/`OFFSET` as its last two
/// parameters. When `parent_id` is set it is bound as `$1` of both queries.
pub struct PageQuery {
    pub count_sql: String,
    pub page_sql: String,
    pub parent_id: Option<Uuid>,
}

/// Run a [`PageQuery`] and build the connection for `args`
///
/// Count and page are read from one repeatable-read snapshot so cursors stay
/// consistent with `hasNextPage`/`hasPreviousPage` while the table changes.
pub async fn fetch_connection<T>(
    pool: &PgPool,
    query: PageQuery,
    args: &ConnectionArgs,
) -> ApiResult<Connection<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    // Reject malformed arguments before touching the database
    args.window(0)?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let mut count = sqlx::query_scalar::<_, i64>(&query.count_sql);
    if let Some(parent_id) = query.parent_id {
        count = count.bind(parent_id);
    }
    let total = count.fetch_one(&mut *tx).await?;
    let total_len = usize::try_from(total).unwrap_or(0);

    let window = args.window(total_len)?;

    let slice = if window.is_empty() {
        Vec::new()
    } else {
        let mut page = sqlx::query_as::<_, T>(&query.page_sql);
        if let Some(parent_id) = query.parent_id {
            page = page.bind(parent_id);
        }
        page.bind(window.len() as i64)
            .bind(window.start as i64)
            .fetch_all(&mut *tx)
            .await?
    };

    tx.commit().await?;

    Ok(connection_from_slice(slice, window.start, total_len, args)?)
}

/// Parse a store-local id; malformed ids can never match a row
pub fn parse_local_id(local_id: &str) -> Option<Uuid> {
    Uuid::parse_str(local_id).ok()
}

/// Whether a database error is a foreign-key violation (SQLSTATE 23503)
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503")
    )
}
