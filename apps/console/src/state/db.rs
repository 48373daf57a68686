//! # Database State
//!
//! Wraps the [`DataSource`] picked at startup so commands can ask for a
//! database without caring whether one exists.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn dashboard_stats(db: &DbState, ...) -> Result<DashboardDto, ApiError> {
//!     let stats = db.database().await?.dashboard().stats().await?;
//!     ...
//! }
//! ```
//!
//! In demo mode [`DbState::database`] yields `ErrorCode::DemoMode`.

use tokio::sync::RwLock;

use crate::error::ApiError;
use stockroom_db::{DataSource, Database, DbConfig};

/// Connection handle plus the config needed to reconnect.
///
/// The lock is only taken for writing by [`DbState::reconnect`].
#[derive(Debug)]
pub struct DbState {
    source: RwLock<DataSource>,
    config: DbConfig,
}

impl DbState {
    pub fn new(source: DataSource, config: DbConfig) -> Self {
        DbState {
            source: RwLock::new(source),
            config,
        }
    }

    /// Probes `config` and wraps the result.
    pub async fn connect(config: DbConfig) -> Self {
        let source = DataSource::connect(&config).await;
        DbState::new(source, config)
    }

    /// A handle to the connected database.
    ///
    /// `Database` clones share the one pooled connection.
    pub async fn database(&self) -> Result<Database, ApiError> {
        let source = self.source.read().await;
        Ok(source.database()?.clone())
    }

    pub async fn is_demo(&self) -> bool {
        self.source.read().await.is_demo()
    }

    pub async fn status_message(&self) -> String {
        self.source.read().await.status_message()
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Drops the current connection and probes again.
    pub async fn reconnect(&self) -> String {
        let mut source = self.source.write().await;
        source.refresh(&self.config).await;
        source.status_message()
    }

    /// Closes the connection, if any.
    pub async fn close(&self) {
        if let DataSource::Connected(db) = &*self.source.read().await {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_in_memory_is_connected() {
        let state = DbState::connect(DbConfig::in_memory()).await;
        assert!(!state.is_demo().await);
        assert!(state.database().await.is_ok());
    }

    #[tokio::test]
    async fn test_demo_source_refuses_database() {
        let state = DbState::new(DataSource::demo("no file"), DbConfig::in_memory());
        assert!(state.is_demo().await);
        assert_eq!(state.status_message().await, "Demo mode (no file)");

        let err = state.database().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DemoMode);
    }

    #[tokio::test]
    async fn test_reconnect_reprobes() {
        let state = DbState::new(DataSource::demo("startup"), DbConfig::in_memory());
        let status = state.reconnect().await;

        assert!(status.starts_with("Connected to"));
        assert!(!state.is_demo().await);
    }
}
