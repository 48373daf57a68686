//! # Schema Migrations
//!
//! The Stock Room schema ships inside the binary and is brought up to date
//! whenever a database is opened.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  migrations/sqlite/                                                     │
//! │  ├── 001_initial_schema.sql     users, categories, suppliers,           │
//! │  │                              inventory_items, stock_movements        │
//! │  └── 002_movement_indexes.sql   movement date / item lookups            │
//! │                                                                         │
//! │  Database::new                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_pending ──► sqlx records each file in _sqlx_migrations           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_schema ──► every table the repositories query must exist        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Existing files are never edited; schema changes go in a new numbered file.

use sqlx::SqlitePool;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Tables the repositories read and write.
pub const REQUIRED_TABLES: [&str; 5] = [
    "users",
    "categories",
    "suppliers",
    "inventory_items",
    "stock_movements",
];

/// How far a database's schema has come.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatus {
    /// Migrations embedded in this build.
    pub known: usize,
    /// Migrations recorded as applied in the database.
    pub applied: usize,
    /// Entries of [`REQUIRED_TABLES`] that do not exist.
    pub missing_tables: Vec<String>,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.known && self.missing_tables.is_empty()
    }
}

/// Applies every embedded migration the database has not seen yet.
pub async fn apply_pending(pool: &SqlitePool) -> DbResult<()> {
    let start = Instant::now();
    MIGRATOR.run(pool).await?;

    info!(
        migrations = MIGRATOR.migrations.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Schema up to date"
    );
    Ok(())
}

pub async fn schema_status(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let existing: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    let applied = if existing.iter().any(|t| t == "_sqlx_migrations") {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
                .fetch_one(pool)
                .await?;
        usize::try_from(count).unwrap_or(0)
    } else {
        0
    };

    let missing_tables = REQUIRED_TABLES
        .iter()
        .filter(|t| !existing.iter().any(|e| e == *t))
        .map(|t| t.to_string())
        .collect();

    Ok(SchemaStatus {
        known: MIGRATOR.migrations.len(),
        applied,
        missing_tables,
    })
}

/// Fails when a table the repositories need is absent, e.g. a file that
/// was opened with migrations disabled and never set up.
pub async fn verify_schema(pool: &SqlitePool) -> DbResult<()> {
    let status = schema_status(pool).await?;
    debug!(known = status.known, applied = status.applied, "Schema status");

    if status.missing_tables.is_empty() {
        Ok(())
    } else {
        Err(DbError::MigrationFailed(format!(
            "missing tables: {}",
            status.missing_tables.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_database_is_current() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let status = schema_status(db.pool()).await.unwrap();
        assert!(status.is_current(), "{:?}", status);
        assert_eq!(status.applied, status.known);
    }

    #[tokio::test]
    async fn test_reapplying_changes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        apply_pending(db.pool()).await.unwrap();
        let status = schema_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, status.known);
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_missing_tables() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = schema_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert_eq!(status.missing_tables.len(), REQUIRED_TABLES.len());
        assert!(!status.is_current());

        let err = verify_schema(db.pool()).await.unwrap_err();
        assert!(matches!(err, DbError::MigrationFailed(msg) if msg.contains("inventory_items")));
    }
}
