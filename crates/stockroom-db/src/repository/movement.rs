//! # Stock Movement Repository
//!
//! Records stock changes and applies them to the item in one transaction.
//!
//! ## Quantity Effects
//! ```text
//! ┌─────────────┬──────────────────────────┬─────────────────────────────┐
//! │ Type        │ Item quantity            │ Also                        │
//! ├─────────────┼──────────────────────────┼─────────────────────────────┤
//! │ In          │ + quantity               │ last_restocked = now        │
//! │ Out         │ − quantity (floor 0)     │                             │
//! │ Adjustment  │ + signed delta (floor 0) │                             │
//! │ Transfer    │ unchanged                │ history row only            │
//! └─────────────┴──────────────────────────┴─────────────────────────────┘
//! ```
//!
//! A movement that would take stock below zero, or above `MAX_QUANTITY`,
//! is rejected and nothing is written.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use stockroom_core::validation::validate_movement;
use stockroom_core::{
    MovementType, NewStockMovement, StockMovement, ValidationError, MAX_QUANTITY,
};

const MOVEMENT_SELECT: &str = r#"
    SELECT
        m.id, m.item_id, m.movement_type, m.quantity, m.reference, m.reason,
        m.movement_date, m.user_id, m.notes,
        i.name AS item_name, u.full_name AS user_name
    FROM stock_movements m
    LEFT JOIN inventory_items i ON i.id = m.item_id
    LEFT JOIN users u ON u.id = m.user_id
"#;

/// Repository for stock movements.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Records a movement and updates the item's quantity.
    ///
    /// ## Errors
    /// * `Validation` - non-positive quantity (zero for adjustments), or a
    ///   quantity or resulting stock level above `MAX_QUANTITY`
    /// * `NotFound` - unknown item
    /// * `InsufficientStock` - the item would go below zero
    pub async fn record(&self, movement: &NewStockMovement) -> DbResult<i64> {
        validate_movement(movement)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT quantity, sku FROM inventory_items WHERE id = ?")
                .bind(movement.item_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (available, sku) =
            row.ok_or_else(|| DbError::not_found("Inventory item", movement.item_id))?;

        let delta = movement.movement_type.quantity_delta(movement.quantity);
        let new_quantity = available
            .checked_add(delta)
            .filter(|q| *q <= MAX_QUANTITY)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: MAX_QUANTITY,
            })?;
        if new_quantity < 0 {
            // Dropping `tx` rolls back.
            return Err(DbError::InsufficientStock {
                sku: if sku.is_empty() {
                    format!("item {}", movement.item_id)
                } else {
                    sku
                },
                available,
                requested: delta.saturating_neg(),
            });
        }

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO stock_movements (
                item_id, movement_type, quantity, reference, reason,
                movement_date, user_id, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movement.item_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.reference)
        .bind(&movement.reason)
        .bind(now)
        .bind(movement.user_id)
        .bind(&movement.notes)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        match movement.movement_type {
            MovementType::In => {
                sqlx::query(
                    "UPDATE inventory_items SET quantity = ?, last_updated = ?, last_restocked = ? WHERE id = ?",
                )
                .bind(new_quantity)
                .bind(now)
                .bind(now)
                .bind(movement.item_id)
                .execute(&mut *tx)
                .await?;
            }
            MovementType::Out | MovementType::Adjustment => {
                sqlx::query("UPDATE inventory_items SET quantity = ?, last_updated = ? WHERE id = ?")
                    .bind(new_quantity)
                    .bind(now)
                    .bind(movement.item_id)
                    .execute(&mut *tx)
                    .await?;
            }
            MovementType::Transfer => {}
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id,
            item_id = movement.item_id,
            kind = %movement.movement_type,
            quantity = movement.quantity,
            new_quantity,
            "Stock movement recorded"
        );
        Ok(id)
    }

    /// Most recent movements first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<StockMovement>> {
        let sql = format!("{MOVEMENT_SELECT} ORDER BY m.movement_date DESC, m.id DESC LIMIT ?");
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = movements.len(), "Listed recent movements");
        Ok(movements)
    }

    /// History of one item, newest first.
    pub async fn list_for_item(&self, item_id: i64) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "{MOVEMENT_SELECT} WHERE m.item_id = ? ORDER BY m.movement_date DESC, m.id DESC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Movements recorded at or after `since`.
    pub async fn count_since(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE movement_date >= ?")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{item, seed_catalog, test_db};
    use crate::Database;
    use chrono::Duration;

    fn movement(item_id: i64, movement_type: MovementType, quantity: i64) -> NewStockMovement {
        NewStockMovement {
            item_id,
            movement_type,
            quantity,
            reference: "PO-1001".to_string(),
            reason: String::new(),
            user_id: None,
            notes: String::new(),
        }
    }

    async fn stocked_item(db: &Database) -> i64 {
        let (c, s) = seed_catalog(db).await;
        db.inventory().create(&item("Stapler", "STP-01", c, s)).await.unwrap()
    }

    async fn quantity(db: &Database, id: i64) -> i64 {
        db.inventory().get_by_id(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_in_adds_and_stamps_restock() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        db.movements().record(&movement(id, MovementType::In, 5)).await.unwrap();

        let stored = db.inventory().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 25);
        assert!(stored.last_restocked.is_some());
    }

    #[tokio::test]
    async fn test_out_subtracts() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        db.movements().record(&movement(id, MovementType::Out, 8)).await.unwrap();
        assert_eq!(quantity(&db, id).await, 12);
    }

    #[tokio::test]
    async fn test_out_beyond_stock_is_rejected_atomically() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        let err = db
            .movements()
            .record(&movement(id, MovementType::Out, 21))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock { available: 20, requested: 21, .. }
        ));

        assert_eq!(quantity(&db, id).await, 20);
        assert!(db.movements().list_for_item(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjustment_is_signed() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        db.movements().record(&movement(id, MovementType::Adjustment, -3)).await.unwrap();
        assert_eq!(quantity(&db, id).await, 17);
        db.movements().record(&movement(id, MovementType::Adjustment, 4)).await.unwrap();
        assert_eq!(quantity(&db, id).await, 21);

        let err = db
            .movements()
            .record(&movement(id, MovementType::Adjustment, -50))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn test_extreme_quantities_are_rejected_without_writing() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        for m in [
            movement(id, MovementType::In, i64::MAX),
            movement(id, MovementType::Adjustment, i64::MIN),
            movement(id, MovementType::Out, i64::MAX),
        ] {
            let err = db.movements().record(&m).await.unwrap_err();
            assert!(
                matches!(err, DbError::Validation(ValidationError::OutOfRange { .. })),
                "{:?}",
                err
            );
        }

        assert_eq!(quantity(&db, id).await, 20);
        assert!(db.movements().list_for_item(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_level_cannot_pass_the_cap() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        let err = db
            .movements()
            .record(&movement(id, MovementType::In, MAX_QUANTITY))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(quantity(&db, id).await, 20);

        db.movements()
            .record(&movement(id, MovementType::In, MAX_QUANTITY - 20))
            .await
            .unwrap();
        assert_eq!(quantity(&db, id).await, MAX_QUANTITY);
    }

    #[tokio::test]
    async fn test_transfer_leaves_quantity() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        db.movements().record(&movement(id, MovementType::Transfer, 7)).await.unwrap();
        assert_eq!(quantity(&db, id).await, 20);
        assert_eq!(db.movements().list_for_item(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_and_unknown_item() {
        let db = test_db().await;
        let id = stocked_item(&db).await;

        let err = db
            .movements()
            .record(&movement(id, MovementType::In, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::MustBePositive { .. })));

        let err = db
            .movements()
            .record(&movement(9999, MovementType::In, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_recent_listing_and_counts() {
        let db = test_db().await;
        let id = stocked_item(&db).await;
        let user = db
            .users()
            .create(&stockroom_core::NewUser {
                username: "clerk".to_string(),
                password: "clerk123".to_string(),
                full_name: "Store Clerk".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.movements().record(&movement(id, MovementType::In, 1)).await.unwrap();
        db.movements()
            .record(&NewStockMovement {
                user_id: Some(user),
                ..movement(id, MovementType::Out, 2)
            })
            .await
            .unwrap();

        let recent = db.movements().list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].movement_type, MovementType::Out);
        assert_eq!(recent[0].item_name.as_deref(), Some("Stapler"));
        assert_eq!(recent[0].user_name.as_deref(), Some("Store Clerk"));
        assert!(recent[1].user_name.is_none());

        assert_eq!(db.movements().list_recent(1).await.unwrap().len(), 1);
        assert_eq!(
            db.movements().count_since(Utc::now() - Duration::days(30)).await.unwrap(),
            2
        );
        assert_eq!(
            db.movements().count_since(Utc::now() + Duration::days(1)).await.unwrap(),
            0
        );
    }
}
