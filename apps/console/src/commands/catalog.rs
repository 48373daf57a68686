//! # Catalog Commands
//!
//! Categories and suppliers. Listing is open to any signed-in user; adding
//! needs an editing role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commands::require_editor;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use stockroom_core::{Category, NewCategory, NewSupplier, Supplier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
            description: c.description,
            item_count: c.item_count,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: i64,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub notes: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        SupplierDto {
            id: s.id,
            name: s.name,
            contact_person: s.contact_person,
            phone: s.phone,
            email: s.email,
            address: s.address,
            city: s.city,
            postal_code: s.postal_code,
            country: s.country,
            notes: s.notes,
            item_count: s.item_count,
            created_at: s.created_at,
        }
    }
}

/// Active categories by name, with active item counts.
pub async fn list_categories(
    db: &DbState,
    session: &SessionState,
) -> Result<Vec<CategoryDto>, ApiError> {
    session.require_user()?;
    let categories = db.database().await?.categories().list_active().await?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

pub async fn create_category(
    db: &DbState,
    session: &SessionState,
    category: NewCategory,
) -> Result<CategoryDto, ApiError> {
    let user = require_editor(session, "manage categories")?;
    let db = db.database().await?;

    let id = db.categories().create(&category).await?;
    info!(id, name = %category.name, user = %user.username, "Category created");

    db.categories()
        .get_by_id(id)
        .await?
        .map(CategoryDto::from)
        .ok_or_else(|| ApiError::not_found("Category", &id.to_string()))
}

/// Active suppliers by name, with active item counts.
pub async fn list_suppliers(
    db: &DbState,
    session: &SessionState,
) -> Result<Vec<SupplierDto>, ApiError> {
    session.require_user()?;
    let suppliers = db.database().await?.suppliers().list_active().await?;
    Ok(suppliers.into_iter().map(SupplierDto::from).collect())
}

pub async fn create_supplier(
    db: &DbState,
    session: &SessionState,
    supplier: NewSupplier,
) -> Result<SupplierDto, ApiError> {
    let user = require_editor(session, "manage suppliers")?;
    let db = db.database().await?;

    let id = db.suppliers().create(&supplier).await?;
    info!(id, name = %supplier.name, user = %user.username, "Supplier created");

    db.suppliers()
        .get_by_id(id)
        .await?
        .map(SupplierDto::from)
        .ok_or_else(|| ApiError::not_found("Supplier", &id.to_string()))
}
