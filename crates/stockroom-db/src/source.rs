//! # Data Source
//!
//! Decides at startup whether Stock Room runs against a real database or
//! in demo mode.
//!
//! ## Connection Decision
//! ```text
//!   DbConfig
//!      │
//!      ▼
//!   file exists? ──no──► create_if_missing? ──no──► Demo { "not found" }
//!      │                        │
//!     yes                      yes
//!      │◄───────────────────────┘
//!      ▼
//!   Database::new() ──err──► Demo { error }
//!      │
//!      ▼
//!   health_check() ──false──► Demo { "not responding" }
//!      │
//!      ▼
//!   Connected(Database)
//! ```
//!
//! Neither branch is fatal: demo mode keeps the shell usable with the
//! built-in accounts.

use std::fmt;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};

/// Where data comes from for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum DataSource {
    Connected(Database),
    Demo { reason: String },
}

impl DataSource {
    /// Probes the configured database. Never fails; problems yield `Demo`.
    pub async fn connect(config: &DbConfig) -> Self {
        if !config.database_exists() && !config.create_if_missing {
            let reason = format!(
                "database file not found at {}",
                config.database_path.display()
            );
            warn!(path = %config.database_path.display(), "Database missing, entering demo mode");
            return DataSource::Demo { reason };
        }

        let db = match Database::new(config.clone()).await {
            Ok(db) => db,
            Err(e) => {
                warn!(error = %e, "Database open failed, entering demo mode");
                return DataSource::Demo {
                    reason: e.to_string(),
                };
            }
        };

        if !db.health_check().await {
            warn!("Database health check failed, entering demo mode");
            db.close().await;
            return DataSource::Demo {
                reason: "database is not responding".to_string(),
            };
        }

        info!(path = %db.path().display(), "Database connected");
        DataSource::Connected(db)
    }

    /// Demo mode without probing anything.
    pub fn demo(reason: impl Into<String>) -> Self {
        DataSource::Demo {
            reason: reason.into(),
        }
    }

    /// Closes any current connection and probes again.
    pub async fn refresh(&mut self, config: &DbConfig) {
        if let DataSource::Connected(db) = self {
            db.close().await;
        }
        *self = DataSource::connect(config).await;
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, DataSource::Demo { .. })
    }

    /// The database, or `Unavailable` in demo mode.
    pub fn database(&self) -> DbResult<&Database> {
        match self {
            DataSource::Connected(db) => Ok(db),
            DataSource::Demo { reason } => Err(DbError::Unavailable(reason.clone())),
        }
    }

    /// One line suitable for a status bar.
    pub fn status_message(&self) -> String {
        match self {
            DataSource::Connected(db) => format!("Connected to {}", db.path().display()),
            DataSource::Demo { reason } => format!("Demo mode ({reason})"),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join("stockroom-tests-nonexistent")
            .join("StockRoom.db")
    }

    #[tokio::test]
    async fn test_missing_file_means_demo() {
        let source = DataSource::connect(&DbConfig::new(missing_path())).await;

        assert!(source.is_demo());
        assert!(source.status_message().starts_with("Demo mode"));
        assert!(matches!(source.database(), Err(DbError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unopenable_file_means_demo() {
        // The parent directory does not exist, so creation fails.
        let config = DbConfig::new(missing_path()).create_if_missing(true);
        let source = DataSource::connect(&config).await;
        assert!(source.is_demo());
    }

    #[tokio::test]
    async fn test_in_memory_connects() {
        let source = DataSource::connect(&DbConfig::in_memory()).await;

        assert!(!source.is_demo());
        assert!(source.database().is_ok());
        assert_eq!(source.status_message(), "Connected to :memory:");
    }

    #[tokio::test]
    async fn test_refresh_reprobes() {
        let mut source = DataSource::demo("starting offline");
        source.refresh(&DbConfig::in_memory()).await;
        assert!(!source.is_demo());
    }
}
