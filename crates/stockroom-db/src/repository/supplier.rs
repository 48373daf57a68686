//! # Supplier Repository
//!
//! Vendors, listed with the number of active items bought from each.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::validation::validate_new_supplier;
use stockroom_core::{NewSupplier, RecordStatus, Supplier};

const SUPPLIER_SELECT: &str = r#"
    SELECT
        s.id, s.name, s.contact_person, s.phone, s.email, s.address, s.city,
        s.postal_code, s.country, s.created_at, s.status, s.notes,
        (SELECT COUNT(*) FROM inventory_items i
          WHERE i.supplier_id = s.id AND i.status = 'active') AS item_count
    FROM suppliers s
"#;

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Active suppliers ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("{SUPPLIER_SELECT} WHERE s.status = 'active' ORDER BY s.name");
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let sql = format!("{SUPPLIER_SELECT} WHERE s.id = ?");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Inserts a supplier and returns its id.
    pub async fn create(&self, supplier: &NewSupplier) -> DbResult<i64> {
        validate_new_supplier(supplier)?;
        debug!(name = %supplier.name, "Creating supplier");

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (
                name, contact_person, phone, email, address, city,
                postal_code, country, created_at, status, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(supplier.name.trim())
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(supplier.email.trim())
        .bind(&supplier.address)
        .bind(&supplier.city)
        .bind(&supplier.postal_code)
        .bind(&supplier.country)
        .bind(Utc::now())
        .bind(RecordStatus::Active)
        .bind(&supplier.notes)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Marks a supplier inactive.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating supplier");

        let result = sqlx::query("UPDATE suppliers SET status = ? WHERE id = ?")
            .bind(RecordStatus::Inactive)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
