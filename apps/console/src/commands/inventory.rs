//! # Inventory Commands
//!
//! The F2 panel: item search, item CRUD and stock movements.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items search pen --category 2 --low-stock                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryFilter { search_term: "pen", category_id: 2,                  │
//! │                    low_stock_only: true, .. }                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryQuery::build                                                  │
//! │    WHERE (i.name LIKE ? OR i.description LIKE ? OR i.sku LIKE ?)        │
//! │      AND i.category_id = ?                                              │
//! │      AND i.quantity <= i.minimum_stock                                  │
//! │    ORDER BY i.name ASC                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ItemDto>                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `--page` switches to the paged listing (`LIMIT ? OFFSET ?`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::commands::require_editor;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use stockroom_core::{
    InventoryFilter, InventoryItem, ItemInput, ItemStatus, MovementType, NewStockMovement,
    StockMovement,
};
use stockroom_db::Database;

// =============================================================================
// DTOs
// =============================================================================

/// Item as shown to the shell, with the derived figures filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub barcode: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    pub quantity: i64,
    pub minimum_stock: i64,
    pub reorder_level: i64,
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub total_value_cents: i64,
    pub profit_margin_cents: i64,
    pub profit_percentage: f64,
    pub is_low_stock: bool,
    pub needs_reorder: bool,
    pub status: ItemStatus,
    pub location: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_restocked: Option<DateTime<Utc>>,
}

impl From<InventoryItem> for ItemDto {
    fn from(item: InventoryItem) -> Self {
        ItemDto {
            total_value_cents: item.total_value().cents(),
            profit_margin_cents: item.profit_margin().cents(),
            profit_percentage: item.profit_percentage(),
            is_low_stock: item.is_low_stock(),
            needs_reorder: item.needs_reorder(),
            id: item.id,
            name: item.name,
            description: item.description,
            sku: item.sku,
            barcode: item.barcode,
            category_id: item.category_id,
            category_name: item.category_name,
            supplier_id: item.supplier_id,
            supplier_name: item.supplier_name,
            quantity: item.quantity,
            minimum_stock: item.minimum_stock,
            reorder_level: item.reorder_level,
            unit: item.unit,
            cost_price_cents: item.cost_price_cents,
            selling_price_cents: item.selling_price_cents,
            status: item.status,
            location: item.location,
            notes: item.notes,
            created_at: item.created_at,
            last_updated: item.last_updated,
            last_restocked: item.last_restocked,
        }
    }
}

/// Fields to change on an existing item. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub quantity: Option<i64>,
    pub minimum_stock: Option<i64>,
    pub reorder_level: Option<i64>,
    pub unit: Option<String>,
    pub cost_price_cents: Option<i64>,
    pub selling_price_cents: Option<i64>,
    pub status: Option<ItemStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        *self == ItemChanges::default()
    }

    /// Overlays the changes on `input`.
    pub fn apply(self, input: &mut ItemInput) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field { input.$field = value; })*
            };
        }
        overlay!(
            name,
            description,
            sku,
            barcode,
            quantity,
            minimum_stock,
            reorder_level,
            unit,
            cost_price_cents,
            selling_price_cents,
            status,
            location,
            notes,
        );
        if self.category_id.is_some() {
            input.category_id = self.category_id;
        }
        if self.supplier_id.is_some() {
            input.supplier_id = self.supplier_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub item_id: i64,
    pub movement_type: MovementType,
    /// Signed for adjustments, positive otherwise.
    pub quantity: i64,
    pub reference: String,
    pub reason: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDto {
    pub id: i64,
    pub item_id: i64,
    pub item_name: Option<String>,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reference: String,
    pub reason: String,
    pub movement_date: DateTime<Utc>,
    pub user_name: Option<String>,
    pub notes: String,
}

impl From<StockMovement> for MovementDto {
    fn from(m: StockMovement) -> Self {
        MovementDto {
            id: m.id,
            item_id: m.item_id,
            item_name: m.item_name,
            movement_type: m.movement_type,
            quantity: m.quantity,
            reference: m.reference,
            reason: m.reason,
            movement_date: m.movement_date,
            user_name: m.user_name,
            notes: m.notes,
        }
    }
}

/// Result of recording a movement: its id and the item afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReceipt {
    pub movement_id: i64,
    pub item: ItemDto,
}

// =============================================================================
// Commands
// =============================================================================

/// Searches items.
///
/// ## Arguments
/// * `filter` - any combination of criteria; empty matches every item
/// * `paged` - apply `page_number`/`page_size`
pub async fn search_items(
    db: &DbState,
    session: &SessionState,
    filter: &InventoryFilter,
    paged: bool,
) -> Result<Vec<ItemDto>, ApiError> {
    let start = Instant::now();
    session.require_user()?;

    debug!(?filter, paged, "search_items command");

    let db = db.database().await?;
    let items = if paged {
        db.inventory().list_page(filter).await?
    } else {
        db.inventory().search(filter).await?
    };
    let dtos: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        "search_items complete"
    );
    Ok(dtos)
}

/// One item by id, whatever its status. `None` when there is no such item.
pub async fn get_item(
    db: &DbState,
    session: &SessionState,
    id: i64,
) -> Result<Option<ItemDto>, ApiError> {
    session.require_user()?;
    debug!(id, "get_item command");

    let item = db.database().await?.inventory().get_by_id(id).await?;
    Ok(item.map(ItemDto::from))
}

/// Creates an item and returns it as stored.
pub async fn create_item(
    db: &DbState,
    session: &SessionState,
    input: ItemInput,
) -> Result<ItemDto, ApiError> {
    let user = require_editor(session, "create items")?;
    let db = db.database().await?;

    let id = db.inventory().create(&input).await?;
    info!(id, name = %input.name, user = %user.username, "Item created");

    fetch_item(&db, id).await
}

/// Applies `changes` to an item. `None` when the item does not exist.
pub async fn update_item(
    db: &DbState,
    session: &SessionState,
    id: i64,
    changes: ItemChanges,
) -> Result<Option<ItemDto>, ApiError> {
    let user = require_editor(session, "update items")?;
    if changes.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let db = db.database().await?;
    let Some(existing) = db.inventory().get_by_id(id).await? else {
        return Ok(None);
    };

    let mut input = ItemInput::from(&existing);
    changes.apply(&mut input);

    if !db.inventory().update(id, &input).await? {
        return Ok(None);
    }
    info!(id, user = %user.username, "Item updated");

    fetch_item(&db, id).await.map(Some)
}

/// Marks an item inactive. `false` when the item does not exist.
pub async fn delete_item(
    db: &DbState,
    session: &SessionState,
    id: i64,
) -> Result<bool, ApiError> {
    let user = require_editor(session, "delete items")?;

    let deleted = db.database().await?.inventory().soft_delete(id).await?;
    if deleted {
        info!(id, user = %user.username, "Item deactivated");
    }
    Ok(deleted)
}

/// Records a stock movement against an item, attributed to the signed-in
/// user.
pub async fn record_movement(
    db: &DbState,
    session: &SessionState,
    request: MovementRequest,
) -> Result<MovementReceipt, ApiError> {
    let user = require_editor(session, "record stock movements")?;
    let db = db.database().await?;

    let movement_id = db
        .movements()
        .record(&NewStockMovement {
            item_id: request.item_id,
            movement_type: request.movement_type,
            quantity: request.quantity,
            reference: request.reference,
            reason: request.reason,
            user_id: user.id,
            notes: request.notes,
        })
        .await?;

    let item = fetch_item(&db, request.item_id).await?;
    Ok(MovementReceipt { movement_id, item })
}

/// Latest movements, optionally for one item only.
pub async fn recent_movements(
    db: &DbState,
    session: &SessionState,
    item_id: Option<i64>,
    limit: u32,
) -> Result<Vec<MovementDto>, ApiError> {
    session.require_user()?;
    let db = db.database().await?;

    let movements = match item_id {
        Some(id) => {
            let mut all = db.movements().list_for_item(id).await?;
            all.truncate(limit as usize);
            all
        }
        None => db.movements().list_recent(limit).await?,
    };
    Ok(movements.into_iter().map(MovementDto::from).collect())
}

async fn fetch_item(db: &Database, id: i64) -> Result<ItemDto, ApiError> {
    db.inventory()
        .get_by_id(id)
        .await?
        .map(ItemDto::from)
        .ok_or_else(|| ApiError::not_found("Inventory item", &id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected, seed_catalog, sign_in_as};
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use stockroom_core::{SortField, SortOrder, UserRole};

    fn input(name: &str, sku: &str, category: i64, supplier: i64) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            sku: sku.to_string(),
            category_id: Some(category),
            supplier_id: Some(supplier),
            quantity: 20,
            minimum_stock: 5,
            reorder_level: 10,
            cost_price_cents: 150,
            selling_price_cents: 300,
            ..Default::default()
        }
    }

    async fn stocked(state: &AppState) -> (i64, i64, ItemDto) {
        let (c, s) = seed_catalog(state).await;
        sign_in_as(state, UserRole::Manager);
        let item = create_item(&state.db, &state.session, input("Blue Pen", "PEN-BL", c, s))
            .await
            .unwrap();
        (c, s, item)
    }

    #[tokio::test]
    async fn test_create_returns_derived_fields() {
        let state = connected().await;
        let (_, _, item) = stocked(&state).await;

        assert_eq!(item.category_name.as_deref(), Some("Office"));
        assert_eq!(item.supplier_name.as_deref(), Some("Acme Wholesale"));
        assert_eq!(item.unit, "pcs");
        assert_eq!(item.total_value_cents, 3000);
        assert_eq!(item.profit_margin_cents, 150);
        assert_eq!(item.profit_percentage, 100.0);
        assert!(!item.is_low_stock);
    }

    #[tokio::test]
    async fn test_viewer_cannot_create() {
        let state = connected().await;
        let (c, s) = seed_catalog(&state).await;
        sign_in_as(&state, UserRole::Viewer);

        let err = create_item(&state.db, &state.session, input("Pen", "", c, s))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_missing_required_fields() {
        let state = connected().await;
        sign_in_as(&state, UserRole::Admin);

        let err = create_item(&state.db, &state.session, ItemInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("name is required"));
    }

    #[tokio::test]
    async fn test_search_and_page() {
        let state = connected().await;
        let (c, s, _) = stocked(&state).await;
        for (name, sku) in [("Red Pen", "PEN-RD"), ("Stapler", "STP-01")] {
            create_item(&state.db, &state.session, input(name, sku, c, s))
                .await
                .unwrap();
        }

        let filter = InventoryFilter {
            search_term: Some("pen".to_string()),
            ..Default::default()
        };
        let pens = search_items(&state.db, &state.session, &filter, false)
            .await
            .unwrap();
        let names: Vec<_> = pens.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Blue Pen", "Red Pen"]);

        let filter = InventoryFilter {
            sort_by: SortField::Name,
            sort_order: SortOrder::Desc,
            page_number: 2,
            page_size: 2,
            ..Default::default()
        };
        let page = search_items(&state.db, &state.session, &filter, true)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Blue Pen");
    }

    #[tokio::test]
    async fn test_update_keeps_untouched_fields() {
        let state = connected().await;
        let (_, _, item) = stocked(&state).await;

        let updated = update_item(
            &state.db,
            &state.session,
            item.id,
            ItemChanges {
                selling_price_cents: Some(350),
                location: Some("Aisle 3".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.selling_price_cents, 350);
        assert_eq!(updated.location, "Aisle 3");
        assert_eq!(updated.sku, "PEN-BL");
        assert_eq!(updated.quantity, 20);
        assert!(updated.last_updated.is_some());

        let missing = update_item(
            &state.db,
            &state.session,
            9999,
            ItemChanges {
                notes: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(missing.is_none());

        let err = update_item(&state.db, &state.session, item.id, ItemChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let state = connected().await;
        let (_, _, item) = stocked(&state).await;

        assert!(delete_item(&state.db, &state.session, item.id).await.unwrap());
        assert!(!delete_item(&state.db, &state.session, 9999).await.unwrap());

        let stored = get_item(&state.db, &state.session, item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ItemStatus::Inactive);
        assert_eq!(stored.quantity, 20);
        assert_eq!(stored.cost_price_cents, 150);

        assert!(get_item(&state.db, &state.session, 9999)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_movements() {
        let state = connected().await;
        let (_, _, item) = stocked(&state).await;

        let receipt = record_movement(
            &state.db,
            &state.session,
            MovementRequest {
                item_id: item.id,
                movement_type: MovementType::Out,
                quantity: 16,
                reference: "SO-7".to_string(),
                reason: "office order".to_string(),
                notes: String::new(),
            },
        )
        .await
        .unwrap();
        assert_eq!(receipt.item.quantity, 4);
        assert!(receipt.item.is_low_stock);

        let err = record_movement(
            &state.db,
            &state.session,
            MovementRequest {
                item_id: item.id,
                movement_type: MovementType::Out,
                quantity: 5,
                reference: String::new(),
                reason: String::new(),
                notes: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let history = recent_movements(&state.db, &state.session, Some(item.id), 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.movement_id);
        assert_eq!(history[0].item_name.as_deref(), Some("Blue Pen"));

        let none = recent_movements(&state.db, &state.session, Some(item.id), 0)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_changes_overlay() {
        let mut target = ItemInput {
            name: "Old".to_string(),
            category_id: Some(1),
            ..Default::default()
        };
        ItemChanges {
            name: Some("New".to_string()),
            status: Some(ItemStatus::Discontinued),
            ..Default::default()
        }
        .apply(&mut target);

        assert_eq!(target.name, "New");
        assert_eq!(target.status, ItemStatus::Discontinued);
        assert_eq!(target.category_id, Some(1));
    }
}
