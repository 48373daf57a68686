//! # Category Repository
//!
//! Categories are listed with the number of *active* items that use them.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::validation::validate_new_category;
use stockroom_core::{Category, NewCategory, RecordStatus};

const CATEGORY_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.description, c.created_at, c.status,
        (SELECT COUNT(*) FROM inventory_items i
          WHERE i.category_id = c.id AND i.status = 'active') AS item_count
    FROM categories c
"#;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Active categories ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Category>> {
        let sql = format!("{CATEGORY_SELECT} WHERE c.status = 'active' ORDER BY c.name");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let sql = format!("{CATEGORY_SELECT} WHERE c.id = ?");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a category and returns its id.
    pub async fn create(&self, category: &NewCategory) -> DbResult<i64> {
        validate_new_category(category)?;
        debug!(name = %category.name, "Creating category");

        let result = sqlx::query(
            "INSERT INTO categories (name, description, created_at, status) VALUES (?, ?, ?, ?)",
        )
        .bind(category.name.trim())
        .bind(&category.description)
        .bind(Utc::now())
        .bind(RecordStatus::Active)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Marks a category inactive. Items keep their reference.
    pub async fn deactivate(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deactivating category");

        let result = sqlx::query("UPDATE categories SET status = ? WHERE id = ?")
            .bind(RecordStatus::Inactive)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{item, seed_catalog, test_db};
    use stockroom_core::NewCategory;

    #[tokio::test]
    async fn test_item_count_only_counts_active_items() {
        let db = test_db().await;
        let (c, s) = seed_catalog(&db).await;

        db.inventory().create(&item("Pen", "P-1", c, s)).await.unwrap();
        let gone = db.inventory().create(&item("Quill", "Q-1", c, s)).await.unwrap();
        db.inventory().soft_delete(gone).await.unwrap();

        let categories = db.categories().list_active().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].item_count, 1);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_skips_inactive() {
        let db = test_db().await;
        let repo = db.categories();
        for name in ["Tools", "Cleaning", "Electrical"] {
            repo.create(&NewCategory {
                name: name.to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        }
        let electrical = repo.list_active().await.unwrap()[1].id;
        assert!(repo.deactivate(electrical).await.unwrap());

        let names: Vec<_> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Cleaning", "Tools"]);

        let inactive = repo.get_by_id(electrical).await.unwrap().unwrap();
        assert_eq!(inactive.status, stockroom_core::RecordStatus::Inactive);
        assert!(repo.get_by_id(999).await.unwrap().is_none());
        assert!(!repo.deactivate(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = test_db().await;
        let result = db.categories().create(&NewCategory::default()).await;
        assert!(result.is_err());
    }
}
