//! # Repository Module
//!
//! One repository per table (plus read-only aggregates).
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Console command                                                       │
//! │       │                                                                 │
//! │       │  db.inventory().search(&filter)                                │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── search / list_page / list_active                                  │
//! │  ├── get_by_id / get_by_sku                                            │
//! │  ├── create / update / soft_delete                                     │
//! │  └── count_active                                                      │
//! │       │                                                                 │
//! │       │  SQL text + positional parameters                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Item CRUD and filtered search
//! - [`CategoryRepository`](category::CategoryRepository) - Categories with item counts
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers with item counts
//! - [`UserRepository`](user::UserRepository) - Accounts and credential checks
//! - [`MovementRepository`](movement::MovementRepository) - Stock in/out history
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Dashboard snapshot
//! - [`ReportRepository`](report::ReportRepository) - Low stock, reorder and valuation

pub mod category;
pub mod dashboard;
pub mod inventory;
pub mod movement;
pub mod report;
pub mod supplier;
pub mod user;
