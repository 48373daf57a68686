//! # Dashboard Repository
//!
//! Computes the dashboard snapshot. Nothing is cached: every call runs the
//! counts again.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{DashboardStats, Money, RECENT_MOVEMENT_DAYS};

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Builds a fresh [`DashboardStats`].
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let start = Instant::now();

        let total_items = self
            .scalar("SELECT COUNT(*) FROM inventory_items WHERE status = 'active'")
            .await?;
        let low_stock_items = self
            .scalar(
                "SELECT COUNT(*) FROM inventory_items \
                 WHERE status = 'active' AND quantity <= minimum_stock",
            )
            .await?;
        let out_of_stock_items = self
            .scalar("SELECT COUNT(*) FROM inventory_items WHERE status = 'active' AND quantity = 0")
            .await?;
        let total_categories = self
            .scalar("SELECT COUNT(*) FROM categories WHERE status = 'active'")
            .await?;
        let total_suppliers = self
            .scalar("SELECT COUNT(*) FROM suppliers WHERE status = 'active'")
            .await?;
        let active_users = self
            .scalar("SELECT COUNT(*) FROM users WHERE status = 'active'")
            .await?;
        let value_cents = self
            .scalar(
                "SELECT COALESCE(SUM(quantity * cost_price_cents), 0) FROM inventory_items \
                 WHERE status = 'active'",
            )
            .await?;

        let since = Utc::now() - Duration::days(RECENT_MOVEMENT_DAYS);
        let recent_movements: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE movement_date >= ?")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        debug!(
            total_items,
            low_stock_items,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Dashboard stats computed"
        );

        Ok(DashboardStats {
            total_items,
            low_stock_items,
            out_of_stock_items,
            total_categories,
            total_suppliers,
            active_users,
            total_inventory_value: Money::from_cents(value_cents),
            recent_movements,
            last_updated: Utc::now(),
        })
    }

    async fn scalar(&self, sql: &str) -> DbResult<i64> {
        let value: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(value)
    }
}
