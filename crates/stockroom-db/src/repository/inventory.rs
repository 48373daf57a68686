//! # Inventory Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - Filtered search through [`InventoryQuery`]
//! - CRUD operations
//! - Soft delete (status flip, never `DELETE`)
//!
//! ## Search Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryFilter { search_term: "pen", category_id: 5, .. }             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryQuery::build()          (stockroom-core, pure)                │
//! │       │  SELECT ... WHERE (i.name LIKE ? OR ...) AND i.category_id = ?  │
//! │       │  params: ["%pen%", "%pen%", "%pen%", 5]                         │
//! │       ▼                                                                 │
//! │  executor::fetch_all()            (binds in order, maps rows)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<InventoryItem>  (category / supplier names from LEFT JOINs)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::executor;
use stockroom_core::validation::validate_item;
use stockroom_core::{
    InventoryFilter, InventoryItem, InventoryQuery, ItemInput, ItemStatus, ITEM_SELECT,
};

/// Repository for inventory item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let pens = repo.search(&InventoryFilter {
///     search_term: Some("pen".into()),
///     ..Default::default()
/// }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Returns every item matching `filter`, sorted, without paging.
    ///
    /// An empty filter returns all items regardless of status.
    pub async fn search(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        let query = InventoryQuery::build(filter);

        debug!(
            conditions = %query.where_clause(),
            params = query.params().len(),
            sort = %filter.sort_by,
            "Searching inventory"
        );

        let items = executor::fetch_all(&self.pool, &query.to_sql(), query.params()).await?;

        debug!(count = items.len(), "Search returned items");
        Ok(items)
    }

    /// Like [`search`](Self::search) but returns one page of
    /// `filter.page_size` items.
    pub async fn list_page(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        let query = InventoryQuery::build(filter);
        let params = query.paged_params();

        debug!(
            page = filter.page_number,
            page_size = filter.page_size,
            "Listing inventory page"
        );

        executor::fetch_all(&self.pool, &query.to_paged_sql(), &params).await
    }

    /// Active items sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<InventoryItem>> {
        self.search(&InventoryFilter {
            status: Some(ItemStatus::Active),
            ..Default::default()
        })
        .await
    }

    /// Gets an item by id, whatever its status.
    ///
    /// ## Returns
    /// * `Ok(Some(item))` - Item found
    /// * `Ok(None)` - No such id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let sql = format!("{ITEM_SELECT} WHERE i.id = ?");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets an item by its SKU. Blank SKUs never match.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<InventoryItem>> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Ok(None);
        }

        let sql = format!("{ITEM_SELECT} WHERE i.sku = ?");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a new item and returns its id.
    ///
    /// ## Errors
    /// * `Validation` - name, category or supplier missing, bad values
    /// * `UniqueViolation` - another item already has this SKU
    /// * `ForeignKeyViolation` - category or supplier id does not exist
    pub async fn create(&self, input: &ItemInput) -> DbResult<i64> {
        let input = input.clone().normalized();
        validate_item(&input)?;

        debug!(name = %input.name, sku = %input.sku, "Creating item");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO inventory_items (
                name, description, sku, barcode, category_id, supplier_id,
                quantity, minimum_stock, reorder_level, unit,
                cost_price_cents, selling_price_cents,
                created_at, last_updated, status, location, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(input.quantity)
        .bind(input.minimum_stock)
        .bind(input.reorder_level)
        .bind(&input.unit)
        .bind(input.cost_price_cents)
        .bind(input.selling_price_cents)
        .bind(now)
        .bind(now)
        .bind(input.status)
        .bind(&input.location)
        .bind(&input.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_sku(e, &input.sku))?;

        let id = result.last_insert_rowid();
        debug!(id, "Item created");
        Ok(id)
    }

    /// Overwrites an item's editable fields and stamps `last_updated`.
    ///
    /// ## Returns
    /// * `Ok(true)` - Item updated
    /// * `Ok(false)` - No such id
    pub async fn update(&self, id: i64, input: &ItemInput) -> DbResult<bool> {
        let input = input.clone().normalized();
        validate_item(&input)?;

        debug!(id, name = %input.name, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                name = ?, description = ?, sku = ?, barcode = ?,
                category_id = ?, supplier_id = ?,
                quantity = ?, minimum_stock = ?, reorder_level = ?, unit = ?,
                cost_price_cents = ?, selling_price_cents = ?,
                status = ?, location = ?, notes = ?,
                last_updated = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(input.quantity)
        .bind(input.minimum_stock)
        .bind(input.reorder_level)
        .bind(&input.unit)
        .bind(input.cost_price_cents)
        .bind(input.selling_price_cents)
        .bind(input.status)
        .bind(&input.location)
        .bind(&input.notes)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_sku(e, &input.sku))?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks an item inactive. Quantity and prices are left alone.
    ///
    /// ## Returns
    /// * `Ok(true)` - Item deactivated
    /// * `Ok(false)` - No such id
    pub async fn soft_delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Soft-deleting item");

        let result = sqlx::query(
            "UPDATE inventory_items SET status = ?, last_updated = ? WHERE id = ?",
        )
        .bind(ItemStatus::Inactive)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of active items.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

fn duplicate_sku(err: sqlx::Error, sku: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("sku", sku),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
