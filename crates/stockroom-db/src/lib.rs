//! # stockroom-db: Database Layer for Stock Room
//!
//! SQLite access for Stock Room through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stock Room Data Flow                              │
//! │                                                                         │
//! │  Console command (search_items)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  DataSource   │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (source.rs)  │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Inventory     │    │              │  │   │
//! │  │   │ Connected(db) │◄───│ Category      │    │ 001_init.sql │  │   │
//! │  │   │ Demo{reason}  │    │ User, ...     │    │ 002_idx.sql  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │   executor    │ binds SqlValue list   │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite file (StockRoom.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - `Database` handle and `DbConfig`
//! - [`source`] - Connected-or-demo decision at startup
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{DataSource, DbConfig};
//!
//! let source = DataSource::connect(&DbConfig::new("StockRoom.db")).await;
//! let db = source.database()?;
//! let stats = db.dashboard().stats().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod executor;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use source::DataSource;

pub use repository::category::CategoryRepository;
pub use repository::dashboard::DashboardRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::movement::MovementRepository;
pub use repository::report::ReportRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
