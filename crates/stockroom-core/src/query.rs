//! # Inventory Query Builder
//!
//! Turns a sparse [`InventoryFilter`] into SQL text plus an ordered list of
//! positional parameters. The builder never executes anything; stockroom-db
//! binds [`InventoryQuery::params`] in order and runs the text.
//!
//! ## Predicate Order
//! ```text
//! InventoryFilter
//!   │
//!   ├─ search_term ──► (i.name LIKE ? OR i.description LIKE ? OR i.sku LIKE ?)
//!   ├─ category_id ──► i.category_id = ?
//!   ├─ supplier_id ──► i.supplier_id = ?
//!   ├─ status ───────► i.status = ?
//!   ├─ low_stock ────► i.quantity <= i.minimum_stock
//!   ├─ min_price ────► i.selling_price_cents >= ?
//!   ├─ max_price ────► i.selling_price_cents <= ?
//!   ├─ created_from ─► i.created_at >= ?
//!   └─ created_to ───► i.created_at <= ?
//!         │
//!         ▼
//!   WHERE p1 AND p2 AND ...   (omitted when no predicate applies)
//!   ORDER BY <allow-listed column> ASC|DESC
//! ```
//!
//! Values are only ever bound. Column names only ever come from
//! [`SortField`], so caller text cannot reach the SQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ItemStatus;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Columns selected for every inventory item query, with the category and
/// supplier names resolved through LEFT JOINs.
pub const ITEM_SELECT: &str = "\
SELECT i.id, i.name, i.description, i.sku, i.barcode, i.category_id, i.supplier_id, \
i.quantity, i.minimum_stock, i.reorder_level, i.unit, i.cost_price_cents, \
i.selling_price_cents, i.created_at, i.last_updated, i.last_restocked, i.status, \
i.location, i.notes, c.name AS category_name, s.name AS supplier_name \
FROM inventory_items i \
LEFT JOIN categories c ON c.id = i.category_id \
LEFT JOIN suppliers s ON s.id = i.supplier_id";

// =============================================================================
// Bound Values
// =============================================================================

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Allow-listed sort columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Sku,
    Category,
    Supplier,
    Quantity,
    CostPrice,
    SellingPrice,
    CreatedAt,
    LastUpdated,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Name,
        SortField::Sku,
        SortField::Category,
        SortField::Supplier,
        SortField::Quantity,
        SortField::CostPrice,
        SortField::SellingPrice,
        SortField::CreatedAt,
        SortField::LastUpdated,
        SortField::Status,
    ];

    /// Qualified column the field sorts by.
    pub const fn column(&self) -> &'static str {
        match self {
            SortField::Name => "i.name",
            SortField::Sku => "i.sku",
            SortField::Category => "c.name",
            SortField::Supplier => "s.name",
            SortField::Quantity => "i.quantity",
            SortField::CostPrice => "i.cost_price_cents",
            SortField::SellingPrice => "i.selling_price_cents",
            SortField::CreatedAt => "i.created_at",
            SortField::LastUpdated => "i.last_updated",
            SortField::Status => "i.status",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Sku => "sku",
            SortField::Category => "category",
            SortField::Supplier => "supplier",
            SortField::Quantity => "quantity",
            SortField::CostPrice => "cost_price",
            SortField::SellingPrice => "selling_price",
            SortField::CreatedAt => "created_at",
            SortField::LastUpdated => "last_updated",
            SortField::Status => "status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    /// Accepts `cost_price`, `cost-price` and `CostPrice` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().replace('_', "") == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::NotAllowed {
                field: "order".to_string(),
                allowed: vec!["asc".to_string(), "desc".to_string()],
            }),
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Optional search criteria for inventory listings.
///
/// Every `None`/`false` field is ignored. Paging fields are only used by
/// the paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryFilter {
    pub search_term: Option<String>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub status: Option<ItemStatus>,
    pub low_stock_only: bool,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for InventoryFilter {
    fn default() -> Self {
        InventoryFilter {
            search_term: None,
            category_id: None,
            supplier_id: None,
            status: None,
            low_stock_only: false,
            min_price: None,
            max_price: None,
            created_from: None,
            created_to: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl InventoryFilter {
    /// Search term with surrounding whitespace removed; blank counts as unset.
    pub fn search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// `(limit, offset)` for the requested page, clamped to sane bounds.
    pub fn limit_offset(&self) -> (i64, i64) {
        let size = self.page_size.clamp(1, MAX_PAGE_SIZE) as i64;
        let page = self.page_number.max(1) as i64;
        (size, (page - 1) * size)
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// One AND-ed condition and the values for its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clause: String,
    params: Vec<SqlValue>,
}

impl Predicate {
    /// # Panics
    /// In debug builds, when the number of `?` in `clause` differs from
    /// `params.len()`.
    pub fn new(clause: impl Into<String>, params: Vec<SqlValue>) -> Self {
        let clause = clause.into();
        debug_assert_eq!(
            clause.matches('?').count(),
            params.len(),
            "placeholder/parameter mismatch in `{clause}`"
        );
        Predicate { clause, params }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

// =============================================================================
// Query
// =============================================================================

/// SQL text and parameters built from an [`InventoryFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryQuery {
    conditions: Vec<String>,
    params: Vec<SqlValue>,
    sort_by: SortField,
    sort_order: SortOrder,
    limit: i64,
    offset: i64,
}

impl InventoryQuery {
    /// Builds the query for `filter`.
    pub fn build(filter: &InventoryFilter) -> Self {
        let (limit, offset) = filter.limit_offset();
        let mut query = InventoryQuery {
            conditions: Vec::new(),
            params: Vec::new(),
            sort_by: filter.sort_by,
            sort_order: filter.sort_order,
            limit,
            offset,
        };

        if let Some(term) = filter.search() {
            let pattern = format!("%{term}%");
            query.push(Predicate::new(
                "(i.name LIKE ? OR i.description LIKE ? OR i.sku LIKE ?)",
                vec![
                    SqlValue::Text(pattern.clone()),
                    SqlValue::Text(pattern.clone()),
                    SqlValue::Text(pattern),
                ],
            ));
        }
        if let Some(id) = filter.category_id {
            query.push(Predicate::new("i.category_id = ?", vec![id.into()]));
        }
        if let Some(id) = filter.supplier_id {
            query.push(Predicate::new("i.supplier_id = ?", vec![id.into()]));
        }
        if let Some(status) = filter.status {
            query.push(Predicate::new(
                "i.status = ?",
                vec![status.as_db_str().into()],
            ));
        }
        if filter.low_stock_only {
            query.push(Predicate::new("i.quantity <= i.minimum_stock", vec![]));
        }
        if let Some(min) = filter.min_price {
            query.push(Predicate::new(
                "i.selling_price_cents >= ?",
                vec![min.cents().into()],
            ));
        }
        if let Some(max) = filter.max_price {
            query.push(Predicate::new(
                "i.selling_price_cents <= ?",
                vec![max.cents().into()],
            ));
        }
        if let Some(from) = filter.created_from {
            query.push(Predicate::new("i.created_at >= ?", vec![from.into()]));
        }
        if let Some(to) = filter.created_to {
            query.push(Predicate::new("i.created_at <= ?", vec![to.into()]));
        }

        query
    }

    fn push(&mut self, predicate: Predicate) {
        self.conditions.push(predicate.clause);
        self.params.extend(predicate.params);
    }

    /// Conditions joined with `AND`, without the `WHERE` keyword.
    /// Empty when the filter set nothing.
    pub fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn order_by_clause(&self) -> String {
        format!(
            "ORDER BY {} {}",
            self.sort_by.column(),
            self.sort_order.as_sql()
        )
    }

    /// Full SELECT with WHERE (if any) and ORDER BY. No paging.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from(ITEM_SELECT);
        if self.has_conditions() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause());
        }
        sql.push(' ');
        sql.push_str(&self.order_by_clause());
        sql
    }

    /// [`to_sql`](Self::to_sql) followed by `LIMIT ? OFFSET ?`.
    pub fn to_paged_sql(&self) -> String {
        format!("{} LIMIT ? OFFSET ?", self.to_sql())
    }

    /// [`params`](Self::params) followed by the limit and offset.
    pub fn paged_params(&self) -> Vec<SqlValue> {
        let mut params = self.params.clone();
        params.push(SqlValue::Integer(self.limit));
        params.push(SqlValue::Integer(self.offset));
        params
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn placeholder_count(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let query = InventoryQuery::build(&InventoryFilter::default());

        assert!(!query.has_conditions());
        assert_eq!(query.where_clause(), "");
        assert!(query.params().is_empty());
        assert!(!query.to_sql().contains("WHERE"));
        assert!(query.to_sql().ends_with("ORDER BY i.name ASC"));
    }

    #[test]
    fn test_search_term_expands_to_three_likes() {
        let filter = InventoryFilter {
            search_term: Some("pen".to_string()),
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);

        assert_eq!(
            query.where_clause(),
            "(i.name LIKE ? OR i.description LIKE ? OR i.sku LIKE ?)"
        );
        assert_eq!(query.where_clause().matches(" OR ").count(), 2);
        assert_eq!(
            query.params(),
            &[
                SqlValue::Text("%pen%".to_string()),
                SqlValue::Text("%pen%".to_string()),
                SqlValue::Text("%pen%".to_string()),
            ]
        );
    }

    #[test]
    fn test_category_and_low_stock_order() {
        let filter = InventoryFilter {
            category_id: Some(5),
            low_stock_only: true,
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);

        assert_eq!(
            query.where_clause(),
            "i.category_id = ? AND i.quantity <= i.minimum_stock"
        );
        assert_eq!(query.params(), &[SqlValue::Integer(5)]);
    }

    #[test]
    fn test_full_filter_keeps_fixed_order() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let filter = InventoryFilter {
            search_term: Some("cable".to_string()),
            category_id: Some(2),
            supplier_id: Some(7),
            status: Some(ItemStatus::Active),
            low_stock_only: true,
            min_price: Some(Money::from_cents(100)),
            max_price: Some(Money::from_cents(5000)),
            created_from: Some(from),
            created_to: Some(to),
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);
        let clause = query.where_clause();

        let positions: Vec<usize> = [
            "i.name LIKE",
            "i.category_id",
            "i.supplier_id",
            "i.status",
            "i.quantity <= i.minimum_stock",
            "i.selling_price_cents >=",
            "i.selling_price_cents <=",
            "i.created_at >=",
            "i.created_at <=",
        ]
        .iter()
        .map(|needle| clause.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(placeholder_count(&clause), query.params().len());
        assert_eq!(query.params()[3], SqlValue::Integer(2));
        assert_eq!(query.params()[4], SqlValue::Integer(7));
        assert_eq!(query.params()[5], SqlValue::Text("active".to_string()));
        assert_eq!(query.params()[6], SqlValue::Integer(100));
        assert_eq!(query.params()[7], SqlValue::Integer(5000));
        assert_eq!(query.params()[8], SqlValue::Timestamp(from));
        assert_eq!(query.params()[9], SqlValue::Timestamp(to));
    }

    #[test]
    fn test_blank_search_term_is_ignored() {
        let filter = InventoryFilter {
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!InventoryQuery::build(&filter).has_conditions());

        let padded = InventoryFilter {
            search_term: Some("  pen ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            InventoryQuery::build(&padded).params()[0],
            SqlValue::Text("%pen%".to_string())
        );
    }

    #[test]
    fn test_hostile_search_term_is_bound_not_interpolated() {
        let filter = InventoryFilter {
            search_term: Some("x' OR 1=1; DROP TABLE users; --".to_string()),
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);
        assert!(!query.to_sql().contains("DROP"));
        assert_eq!(placeholder_count(&query.to_sql()), 3);
    }

    #[test]
    fn test_sort_clause() {
        let filter = InventoryFilter {
            sort_by: SortField::Quantity,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(
            InventoryQuery::build(&filter).order_by_clause(),
            "ORDER BY i.quantity DESC"
        );
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("cost_price".parse::<SortField>().unwrap(), SortField::CostPrice);
        assert_eq!("CostPrice".parse::<SortField>().unwrap(), SortField::CostPrice);
        assert_eq!("created-at".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert!("name; DROP TABLE x".parse::<SortField>().is_err());
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_default_query_ignores_paging() {
        let filter = InventoryFilter {
            page_number: 3,
            page_size: 10,
            ..Default::default()
        };
        let query = InventoryQuery::build(&filter);
        assert!(!query.to_sql().contains("LIMIT"));
        assert!(query.to_paged_sql().ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(
            query.paged_params(),
            vec![SqlValue::Integer(10), SqlValue::Integer(20)]
        );
    }

    #[test]
    fn test_limit_offset_clamps() {
        let zeroed = InventoryFilter {
            page_number: 0,
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(zeroed.limit_offset(), (1, 0));

        let huge = InventoryFilter {
            page_size: 10_000,
            ..Default::default()
        };
        assert_eq!(huge.limit_offset(), (MAX_PAGE_SIZE as i64, 0));
    }

    #[test]
    fn test_predicate_accessors() {
        let predicate = Predicate::new("i.quantity > ?", vec![SqlValue::Integer(3)]);
        assert_eq!(predicate.clause(), "i.quantity > ?");
        assert_eq!(predicate.params(), &[SqlValue::Integer(3)]);
    }

    #[test]
    #[should_panic(expected = "placeholder/parameter mismatch")]
    #[cfg(debug_assertions)]
    fn test_predicate_rejects_mismatch() {
        let _ = Predicate::new("i.quantity > ? AND i.quantity < ?", vec![SqlValue::Integer(1)]);
    }
}
