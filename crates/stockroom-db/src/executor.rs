//! Runs text built by `stockroom_core::query` against SQLite.
//!
//! Parameters are bound strictly in the order they were produced, one per
//! `?` placeholder.

use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use std::time::Instant;
use stockroom_core::SqlValue;
use tracing::debug;

use crate::error::DbResult;

/// Binds `params` to `query` in order.
pub(crate) fn bind_params<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Runs `sql` with positional `params` and maps every row to `O`.
pub(crate) async fn fetch_all<O>(pool: &SqlitePool, sql: &str, params: &[SqlValue]) -> DbResult<Vec<O>>
where
    O: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let start = Instant::now();
    let rows = bind_params(sqlx::query_as::<_, O>(sql), params)
        .fetch_all(pool)
        .await?;

    debug!(
        params = params.len(),
        rows = rows.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Query executed"
    );
    Ok(rows)
}
