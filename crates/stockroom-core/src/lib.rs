//! # stockroom-core: Pure Business Logic for Stock Room
//!
//! Domain types, money arithmetic, validation rules, credential checks and
//! the inventory filter builder. Nothing in here touches a database, a file
//! or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stock Room Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Console shell (apps/console)                    │   │
//! │  │   login ──► dashboard ──► inventory / reports / settings        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ stockroom-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   query   │  │   auth    │  │ validation│  │   │
//! │  │   │ Item,User │  │ Filter →  │  │ argon2 /  │  │   form    │  │   │
//! │  │   │ Movement  │  │ SQL text  │  │ demo      │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               stockroom-db (Database Layer)                     │   │
//! │  │         SQLite queries, migrations, repositories                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (InventoryItem, Category, Supplier, User, ...)
//! - [`money`] - Money type with integer cents
//! - [`query`] - Inventory filter and the parameterized query builder
//! - [`auth`] - Password hashing and the demo account table
//! - [`validation`] - Input rules checked before any I/O
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::query::{InventoryFilter, InventoryQuery};
//!
//! let filter = InventoryFilter {
//!     category_id: Some(5),
//!     low_stock_only: true,
//!     ..Default::default()
//! };
//!
//! let query = InventoryQuery::build(&filter);
//! assert_eq!(query.where_clause(), "i.category_id = ? AND i.quantity <= i.minimum_stock");
//! assert_eq!(query.params().len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::AuthenticatedUser;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use query::{
    InventoryFilter, InventoryQuery, Predicate, SortField, SortOrder, SqlValue, ITEM_SELECT,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Unit assigned to items entered without one.
pub const DEFAULT_UNIT: &str = "pcs";

/// Window, in days, counted as "recent" for dashboard stock movements.
pub const RECENT_MOVEMENT_DAYS: i64 = 30;

/// Page size used when a filter does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound on a single page request.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Largest stock level, threshold or movement quantity accepted.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price accepted, in cents. `MAX_QUANTITY * MAX_PRICE_CENTS`
/// still fits in an `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
