//! # Domain Types
//!
//! Core domain records used throughout Stock Room.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │──►│    Category     │   │    Supplier     │◄──┐   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │   │
//! │  │  id             │   │  id             │   │  id             │   │   │
//! │  │  sku / barcode  │   │  name           │   │  name, contact  │   │   │
//! │  │  quantity       │   │  item_count*    │   │  item_count*    │   │   │
//! │  │  cost / selling │   └─────────────────┘   └─────────────────┘   │   │
//! │  │  status         │───────────────────────────────────────────────┘   │
//! │  └────────┬────────┘                                                    │
//! │           │            ┌─────────────────┐   ┌─────────────────┐       │
//! │           └───────────►│  StockMovement  │──►│      User       │       │
//! │                        │  type, quantity │   │  role, status   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  * computed by the query, never stored                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are SQLite `INTEGER PRIMARY KEY` row ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::DEFAULT_UNIT;

/// Case-insensitive lookup of a variant by its display name.
fn parse_variant<T: Copy + fmt::Display>(
    field: &str,
    input: &str,
    variants: &[T],
) -> Result<T, ValidationError> {
    let input = input.trim();
    variants
        .iter()
        .copied()
        .find(|v| v.to_string().eq_ignore_ascii_case(input))
        .ok_or_else(|| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: variants.iter().map(ToString::to_string).collect(),
        })
}

// =============================================================================
// Item Status
// =============================================================================

/// Lifecycle status of an inventory item.
///
/// Deleting an item flips it to `Inactive`; rows are never removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Active,
        ItemStatus::Inactive,
        ItemStatus::Discontinued,
    ];

    /// Value stored in the `status` column.
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Discontinued => "discontinued",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemStatus::Active => "Active",
            ItemStatus::Inactive => "Inactive",
            ItemStatus::Discontinued => "Discontinued",
        })
    }
}

impl FromStr for ItemStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("status", s, &ItemStatus::ALL)
    }
}

// =============================================================================
// Record Status
// =============================================================================

/// Status of categories, suppliers and user accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordStatus::Active => "Active",
            RecordStatus::Inactive => "Inactive",
        })
    }
}

impl FromStr for RecordStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("status", s, &[RecordStatus::Active, RecordStatus::Inactive])
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Access level of a user account.
///
/// ## Permission Matrix
/// ```text
///              view   edit items   manage users
///   Admin       ✓         ✓             ✓
///   Manager     ✓         ✓
///   User        ✓         ✓
///   Viewer      ✓
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    User,
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Manager,
        UserRole::User,
        UserRole::Viewer,
    ];

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Managers and admins.
    #[inline]
    pub const fn is_manager(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    /// Everyone except viewers may change inventory.
    #[inline]
    pub const fn can_edit(&self) -> bool {
        !matches!(self, UserRole::Viewer)
    }

    #[inline]
    pub const fn can_view(&self) -> bool {
        true
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::User => "User",
            UserRole::Viewer => "Viewer",
        })
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("role", s, &UserRole::ALL)
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked item, joined with its category and supplier names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Stock Keeping Unit. Empty when the item has none.
    pub sku: String,
    pub barcode: String,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub quantity: i64,
    /// At or below this quantity the item is "low stock".
    pub minimum_stock: i64,
    /// At or below this quantity the item should be reordered.
    pub reorder_level: i64,
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_restocked: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub location: String,
    pub notes: String,
    /// Joined from `categories`; `None` when the reference does not resolve.
    pub category_name: Option<String>,
    /// Joined from `suppliers`; `None` when the reference does not resolve.
    pub supplier_name: Option<String>,
}

impl InventoryItem {
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// `quantity <= minimum_stock`
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }

    /// `quantity <= reorder_level`
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Stock value at cost: `quantity × cost_price`.
    #[inline]
    pub fn total_value(&self) -> Money {
        self.cost_price().multiply_quantity(self.quantity)
    }

    /// Per-unit margin: `selling_price − cost_price`.
    #[inline]
    pub fn profit_margin(&self) -> Money {
        self.selling_price() - self.cost_price()
    }

    /// Margin as a percentage of cost; 0 when the item cost nothing.
    pub fn profit_percentage(&self) -> f64 {
        if self.cost_price_cents <= 0 {
            return 0.0;
        }
        self.profit_margin().cents() as f64 / self.cost_price_cents as f64 * 100.0
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }
}

/// Field values for creating or updating an item.
///
/// Timestamps, the id and the joined names are owned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub description: String,
    pub sku: String,
    pub barcode: String,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub quantity: i64,
    pub minimum_stock: i64,
    pub reorder_level: i64,
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub status: ItemStatus,
    pub location: String,
    pub notes: String,
}

impl Default for ItemInput {
    fn default() -> Self {
        ItemInput {
            name: String::new(),
            description: String::new(),
            sku: String::new(),
            barcode: String::new(),
            category_id: None,
            supplier_id: None,
            quantity: 0,
            minimum_stock: 0,
            reorder_level: 0,
            unit: DEFAULT_UNIT.to_string(),
            cost_price_cents: 0,
            selling_price_cents: 0,
            status: ItemStatus::Active,
            location: String::new(),
            notes: String::new(),
        }
    }
}

impl ItemInput {
    /// Trims text fields and fills a blank unit with the default.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.sku = self.sku.trim().to_string();
        self.barcode = self.barcode.trim().to_string();
        self.unit = match self.unit.trim() {
            "" => DEFAULT_UNIT.to_string(),
            unit => unit.to_string(),
        };
        self
    }
}

impl From<&InventoryItem> for ItemInput {
    fn from(item: &InventoryItem) -> Self {
        ItemInput {
            name: item.name.clone(),
            description: item.description.clone(),
            sku: item.sku.clone(),
            barcode: item.barcode.clone(),
            category_id: item.category_id,
            supplier_id: item.supplier_id,
            quantity: item.quantity,
            minimum_stock: item.minimum_stock,
            reorder_level: item.reorder_level,
            unit: item.unit.clone(),
            cost_price_cents: item.cost_price_cents,
            selling_price_cents: item.selling_price_cents,
            status: item.status,
            location: item.location.clone(),
            notes: item.notes.clone(),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A grouping of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: RecordStatus,
    /// Number of *active* items in this category.
    pub item_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

// =============================================================================
// Supplier
// =============================================================================

/// A vendor items are bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub status: RecordStatus,
    pub notes: String,
    /// Number of *active* items from this supplier.
    pub item_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub notes: String,
}

// =============================================================================
// User
// =============================================================================

/// A user account as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub status: RecordStatus,
    pub notes: String,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// Account details for registration. Holds the plain password until the
/// repository hashes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received.
    In,
    /// Goods issued.
    Out,
    /// Stock-take correction; quantity is a signed delta.
    Adjustment,
    /// Relocation; the on-hand quantity does not change.
    Transfer,
}

impl MovementType {
    pub const ALL: [MovementType; 4] = [
        MovementType::In,
        MovementType::Out,
        MovementType::Adjustment,
        MovementType::Transfer,
    ];

    /// Change applied to the item's quantity for a movement of `quantity`.
    ///
    /// ```rust
    /// use stockroom_core::MovementType;
    ///
    /// assert_eq!(MovementType::In.quantity_delta(5), 5);
    /// assert_eq!(MovementType::Out.quantity_delta(5), -5);
    /// assert_eq!(MovementType::Adjustment.quantity_delta(-2), -2);
    /// assert_eq!(MovementType::Transfer.quantity_delta(5), 0);
    /// ```
    pub const fn quantity_delta(&self, quantity: i64) -> i64 {
        match self {
            MovementType::In => quantity,
            MovementType::Out => quantity.saturating_neg(),
            MovementType::Adjustment => quantity,
            MovementType::Transfer => 0,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MovementType::In => "In",
            MovementType::Out => "Out",
            MovementType::Adjustment => "Adjustment",
            MovementType::Transfer => "Transfer",
        })
    }
}

impl FromStr for MovementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("movement type", s, &MovementType::ALL)
    }
}

/// A recorded change to an item's stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub item_id: i64,
    pub movement_type: MovementType,
    pub quantity: i64,
    /// PO number, invoice number, etc.
    pub reference: String,
    pub reason: String,
    pub movement_date: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub notes: String,
    pub item_name: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockMovement {
    pub item_id: i64,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reference: String,
    pub reason: String,
    pub user_id: Option<i64>,
    pub notes: String,
}

// =============================================================================
// Dashboard & Reports
// =============================================================================

/// Snapshot shown on the dashboard. Recomputed on every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub total_categories: i64,
    pub total_suppliers: i64,
    pub active_users: i64,
    pub total_inventory_value: Money,
    /// Movements within the last [`crate::RECENT_MOVEMENT_DAYS`] days.
    pub recent_movements: i64,
    pub last_updated: DateTime<Utc>,
}

/// One row of the stock valuation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryValuation {
    /// `None` groups items without a resolvable category.
    pub category_name: Option<String>,
    pub item_count: i64,
    pub total_quantity: i64,
    pub total_value_cents: i64,
}

impl CategoryValuation {
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
