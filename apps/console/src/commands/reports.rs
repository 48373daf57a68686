//! # Report Commands
//!
//! The F3 panel.
//!
//! ```text
//!   report low-stock   active items at or below minimum stock
//!   report reorder     active items at or below reorder level
//!   report valuation   stock value at cost, per category
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::commands::inventory::ItemDto;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use stockroom_core::CategoryValuation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRowDto {
    /// `None` for items whose category does not resolve.
    pub category_name: Option<String>,
    pub item_count: i64,
    pub total_quantity: i64,
    pub total_value_cents: i64,
}

impl From<CategoryValuation> for ValuationRowDto {
    fn from(v: CategoryValuation) -> Self {
        ValuationRowDto {
            category_name: v.category_name,
            item_count: v.item_count,
            total_quantity: v.total_quantity,
            total_value_cents: v.total_value_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReportDto {
    pub rows: Vec<ValuationRowDto>,
    pub total_value_cents: i64,
}

pub async fn low_stock_report(
    db: &DbState,
    session: &SessionState,
) -> Result<Vec<ItemDto>, ApiError> {
    session.require_user()?;
    let items = db.database().await?.reports().low_stock().await?;
    Ok(items.into_iter().map(ItemDto::from).collect())
}

pub async fn reorder_report(
    db: &DbState,
    session: &SessionState,
) -> Result<Vec<ItemDto>, ApiError> {
    session.require_user()?;
    let items = db.database().await?.reports().reorder_list().await?;
    Ok(items.into_iter().map(ItemDto::from).collect())
}

/// Per-category valuation plus the grand total.
pub async fn valuation_report(
    db: &DbState,
    session: &SessionState,
) -> Result<ValuationReportDto, ApiError> {
    let start = Instant::now();
    session.require_user()?;

    let rows: Vec<ValuationRowDto> = db
        .database()
        .await?
        .reports()
        .valuation_by_category()
        .await?
        .into_iter()
        .map(ValuationRowDto::from)
        .collect();
    let total_value_cents = rows
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.total_value_cents));

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        categories = rows.len(),
        "valuation_report complete"
    );
    Ok(ValuationReportDto {
        rows,
        total_value_cents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected, seed_catalog, sign_in_as};
    use stockroom_core::{ItemInput, UserRole};

    #[tokio::test]
    async fn test_reports() {
        let state = connected().await;
        let (c, s) = seed_catalog(&state).await;
        let db = state.db.database().await.unwrap();

        for (name, quantity) in [("Plenty", 50), ("Low", 7), ("Empty", 0)] {
            db.inventory()
                .create(&ItemInput {
                    name: name.to_string(),
                    category_id: Some(c),
                    supplier_id: Some(s),
                    quantity,
                    minimum_stock: 5,
                    reorder_level: 10,
                    cost_price_cents: 100,
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        sign_in_as(&state, UserRole::Viewer);

        let low = low_stock_report(&state.db, &state.session).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Empty");

        let reorder: Vec<_> = reorder_report(&state.db, &state.session)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(reorder, ["Empty", "Low"]);

        let valuation = valuation_report(&state.db, &state.session).await.unwrap();
        assert_eq!(valuation.rows.len(), 1);
        assert_eq!(valuation.rows[0].category_name.as_deref(), Some("Office"));
        assert_eq!(valuation.rows[0].total_quantity, 57);
        assert_eq!(valuation.total_value_cents, 5700);
    }
}
