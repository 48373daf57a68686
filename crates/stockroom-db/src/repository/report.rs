//! # Report Repository
//!
//! Read-only listings behind the Reports panel.
//!
//! ```text
//!   low_stock()              quantity <= minimum_stock, emptiest first
//!   reorder_list()           quantity <= reorder_level, emptiest first
//!   valuation_by_category()  Σ quantity × cost per category, largest first
//! ```
//!
//! All three only consider active items.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::executor;
use stockroom_core::{
    CategoryValuation, InventoryFilter, InventoryItem, InventoryQuery, ItemStatus, SortField,
    ITEM_SELECT,
};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Active items at or below their minimum stock.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let filter = InventoryFilter {
            status: Some(ItemStatus::Active),
            low_stock_only: true,
            sort_by: SortField::Quantity,
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);

        let items = executor::fetch_all(&self.pool, &query.to_sql(), query.params()).await?;
        debug!(count = items.len(), "Low stock report");
        Ok(items)
    }

    /// Active items at or below their reorder level.
    pub async fn reorder_list(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!(
            "{ITEM_SELECT} WHERE i.status = 'active' AND i.quantity <= i.reorder_level \
             ORDER BY i.quantity ASC, i.name ASC"
        );
        let items = sqlx::query_as::<_, InventoryItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Reorder report");
        Ok(items)
    }

    /// Stock value per category. Items whose category does not resolve are
    /// grouped under `None`.
    pub async fn valuation_by_category(&self) -> DbResult<Vec<CategoryValuation>> {
        let rows = sqlx::query_as::<_, CategoryValuation>(
            r#"
            SELECT
                c.name AS category_name,
                COUNT(i.id) AS item_count,
                COALESCE(SUM(i.quantity), 0) AS total_quantity,
                COALESCE(SUM(i.quantity * i.cost_price_cents), 0) AS total_value_cents
            FROM inventory_items i
            LEFT JOIN categories c ON c.id = i.category_id
            WHERE i.status = 'active'
            GROUP BY c.id, c.name
            ORDER BY total_value_cents DESC, c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{item, seed_catalog, test_db};
    use stockroom_core::{ItemInput, Money, NewCategory};

    #[tokio::test]
    async fn test_low_stock_and_reorder() {
        let db = test_db().await;
        let (c, s) = seed_catalog(&db).await;
        let inventory = db.inventory();

        // minimum 5, reorder 10
        inventory.create(&item("Plenty", "A", c, s)).await.unwrap();
        inventory
            .create(&ItemInput {
                quantity: 8,
                ..item("Getting Low", "B", c, s)
            })
            .await
            .unwrap();
        inventory
            .create(&ItemInput {
                quantity: 1,
                ..item("Nearly Gone", "C", c, s)
            })
            .await
            .unwrap();

        let low = db.reports().low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Nearly Gone");

        let reorder: Vec<_> = db
            .reports()
            .reorder_list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(reorder, ["Nearly Gone", "Getting Low"]);
    }

    #[tokio::test]
    async fn test_valuation_by_category() {
        let db = test_db().await;
        let (office, s) = seed_catalog(&db).await;
        let tools = db
            .categories()
            .create(&NewCategory {
                name: "Tools".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        // Office: 20 × 150 + 20 × 150 = 6000
        db.inventory().create(&item("Pen", "A", office, s)).await.unwrap();
        db.inventory().create(&item("Pad", "B", office, s)).await.unwrap();
        // Tools: 4 × 2500 = 10000
        db.inventory()
            .create(&ItemInput {
                quantity: 4,
                cost_price_cents: 2500,
                ..item("Drill", "C", tools, s)
            })
            .await
            .unwrap();

        let rows = db.reports().valuation_by_category().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_name.as_deref(), Some("Tools"));
        assert_eq!(rows[0].total_value(), Money::from_cents(10_000));
        assert_eq!(rows[1].item_count, 2);
        assert_eq!(rows[1].total_quantity, 40);
        assert_eq!(rows[1].total_value_cents, 6000);
    }
}
