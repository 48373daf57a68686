//! # Dashboard Command
//!
//! The F1 panel. Stats are recomputed on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use stockroom_core::DashboardStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub total_categories: i64,
    pub total_suppliers: i64,
    pub active_users: i64,
    pub total_inventory_value_cents: i64,
    pub recent_movements: i64,
    pub last_updated: DateTime<Utc>,
}

impl From<DashboardStats> for DashboardDto {
    fn from(s: DashboardStats) -> Self {
        DashboardDto {
            total_items: s.total_items,
            low_stock_items: s.low_stock_items,
            out_of_stock_items: s.out_of_stock_items,
            total_categories: s.total_categories,
            total_suppliers: s.total_suppliers,
            active_users: s.active_users,
            total_inventory_value_cents: s.total_inventory_value.cents(),
            recent_movements: s.recent_movements,
            last_updated: s.last_updated,
        }
    }
}

/// Current dashboard snapshot.
///
/// ## Layout
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │  Items 184     Low stock 12    Out 3          │
/// │  Categories 4  Suppliers 3     Users 2        │
/// │  Inventory value  $18240.50                   │
/// │  Movements (30 days)  57                      │
/// └──────────────────────────────────────────────┘
/// ```
pub async fn dashboard_stats(
    db: &DbState,
    session: &SessionState,
) -> Result<DashboardDto, ApiError> {
    let start = Instant::now();
    session.require_user()?;

    let stats = db.database().await?.dashboard().stats().await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        total_items = stats.total_items,
        "dashboard_stats complete"
    );
    Ok(DashboardDto::from(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected, demo, seed_catalog, sign_in_as};
    use crate::error::ErrorCode;
    use stockroom_core::{ItemInput, UserRole};

    #[tokio::test]
    async fn test_requires_login() {
        let state = connected().await;
        let err = dashboard_stats(&state.db, &state.session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_demo_mode_has_no_stats() {
        let state = demo(true);
        sign_in_as(&state, UserRole::Admin);
        let err = dashboard_stats(&state.db, &state.session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DemoMode);
    }

    #[tokio::test]
    async fn test_viewer_sees_totals() {
        let state = connected().await;
        let (c, s) = seed_catalog(&state).await;
        state
            .db
            .database()
            .await
            .unwrap()
            .inventory()
            .create(&ItemInput {
                name: "Stapler".to_string(),
                category_id: Some(c),
                supplier_id: Some(s),
                quantity: 4,
                minimum_stock: 5,
                cost_price_cents: 250,
                ..Default::default()
            })
            .await
            .unwrap();

        sign_in_as(&state, UserRole::Viewer);
        let stats = dashboard_stats(&state.db, &state.session).await.unwrap();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.total_inventory_value_cents, 1000);
    }
}
