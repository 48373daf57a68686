//! # User Repository
//!
//! Accounts and credential checks.
//!
//! ## Login Flow
//! ```text
//! validate_credentials("jdoe", "pw")
//!      │
//!      ▼
//! SELECT ... WHERE username = ? AND status = 'active'
//!      │
//!      ├── no row ──────────────────► Ok(None)
//!      ▼
//! auth::verify_password(pw, hash)
//!      │
//!      ├── mismatch ────────────────► Ok(None)
//!      ▼
//! UPDATE users SET last_login = now
//!      │
//!      ▼
//! Ok(Some(user))
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use stockroom_core::auth::{hash_password, verify_password};
use stockroom_core::validation::{validate_email, validate_name, validate_new_user, validate_password};
use stockroom_core::{CoreError, NewUser, RecordStatus, User, UserRole};

const USER_SELECT: &str = r#"
    SELECT id, username, password_hash, full_name, email, phone, role,
           created_at, last_login, status, notes
    FROM users
"#;

/// Username given to the account created on an empty database.
pub const BOOTSTRAP_ADMIN: &str = "admin";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Checks a username/password pair and records the login.
    ///
    /// ## Returns
    /// * `Ok(Some(user))` - Active account, correct password
    /// * `Ok(None)` - Unknown, inactive or wrong password
    pub async fn validate_credentials(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        let username = username.trim();
        debug!(username = %username, "Validating credentials");

        let sql = format!("{USER_SELECT} WHERE username = ? AND status = 'active'");
        let Some(mut user) = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash) {
            debug!(username = %username, "Password mismatch");
            return Ok(None);
        }

        let now = Utc::now();
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(now)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        user.last_login = Some(now);

        Ok(Some(user))
    }

    /// Registers an account and returns its id.
    ///
    /// ## Errors
    /// * `Validation` - bad username, short password, missing full name
    /// * `UniqueViolation` - username taken
    pub async fn create(&self, user: &NewUser) -> DbResult<i64> {
        validate_new_user(user)?;
        let username = user.username.trim();
        debug!(username = %username, role = %user.role, "Creating user");

        let hash = hash_password(&user.password).map_err(core_to_db)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                username, password_hash, full_name, email, phone, role,
                created_at, status, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, '')
            "#,
        )
        .bind(username)
        .bind(hash)
        .bind(user.full_name.trim())
        .bind(user.email.trim())
        .bind(&user.phone)
        .bind(user.role)
        .bind(Utc::now())
        .bind(RecordStatus::Active)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// All accounts, ordered by full name.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("{USER_SELECT} ORDER BY full_name");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE username = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Saves profile, role and status. The password is left alone.
    pub async fn update(&self, user: &User) -> DbResult<bool> {
        validate_name("full name", &user.full_name)?;
        validate_email(&user.email)?;
        debug!(id = user.id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                full_name = ?, email = ?, phone = ?, role = ?, status = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(user.full_name.trim())
        .bind(user.email.trim())
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.status)
        .bind(&user.notes)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces a user's password.
    pub async fn set_password(&self, id: i64, password: &str) -> DbResult<bool> {
        validate_password(password)?;
        let hash = hash_password(password).map_err(core_to_db)?;

        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Creates an `admin` account when the table is completely empty, so a
    /// freshly created database can be logged into.
    ///
    /// ## Returns
    /// * `Ok(Some(id))` - Account created
    /// * `Ok(None)` - Users already exist
    pub async fn bootstrap_admin(&self, password: &str) -> DbResult<Option<i64>> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(None);
        }

        let id = self
            .create(&NewUser {
                username: BOOTSTRAP_ADMIN.to_string(),
                password: password.to_string(),
                full_name: "Administrator".to_string(),
                role: UserRole::Admin,
                ..Default::default()
            })
            .await?;

        warn!(username = BOOTSTRAP_ADMIN, "No users found, created bootstrap admin account");
        info!(id, "Bootstrap admin ready");
        Ok(Some(id))
    }
}

fn core_to_db(err: CoreError) -> DbError {
    match err {
        CoreError::Validation(v) => DbError::Validation(v),
        other => DbError::Internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    fn clerk() -> NewUser {
        NewUser {
            username: "clerk".to_string(),
            password: "clerk123".to_string(),
            full_name: "Store Clerk".to_string(),
            email: "clerk@stockroom.test".to_string(),
            role: UserRole::User,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let db = test_db().await;
        let repo = db.users();
        repo.create(&clerk()).await.unwrap();

        let user = repo
            .validate_credentials("clerk", "clerk123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.full_name, "Store Clerk");
        assert!(user.last_login.is_some());

        let stored = repo.get_by_username("clerk").await.unwrap().unwrap();
        assert!(stored.last_login.is_some());
        assert_ne!(stored.password_hash, "clerk123");

        assert!(repo.validate_credentials("clerk", "nope").await.unwrap().is_none());
        assert!(repo.validate_credentials("nobody", "clerk123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let db = test_db().await;
        let repo = db.users();
        repo.create(&clerk()).await.unwrap();

        let mut user = repo.get_by_username("clerk").await.unwrap().unwrap();
        user.status = RecordStatus::Inactive;
        assert!(repo.update(&user).await.unwrap());

        assert!(repo.validate_credentials("clerk", "clerk123").await.unwrap().is_none());
        assert_eq!(repo.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = test_db().await;
        db.users().create(&clerk()).await.unwrap();

        let err = db.users().create(&clerk()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "username"));
    }

    #[tokio::test]
    async fn test_list_orders_by_full_name() {
        let db = test_db().await;
        let repo = db.users();
        repo.create(&clerk()).await.unwrap();
        repo.create(&NewUser {
            username: "boss".to_string(),
            full_name: "Ann Owner".to_string(),
            role: UserRole::Admin,
            ..clerk()
        })
        .await
        .unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|u| u.full_name).collect();
        assert_eq!(names, ["Ann Owner", "Store Clerk"]);
    }

    #[tokio::test]
    async fn test_set_password() {
        let db = test_db().await;
        let id = db.users().create(&clerk()).await.unwrap();

        assert!(db.users().set_password(id, "fresh-pass").await.unwrap());
        assert!(db.users().validate_credentials("clerk", "clerk123").await.unwrap().is_none());
        assert!(db.users().validate_credentials("clerk", "fresh-pass").await.unwrap().is_some());
        assert!(db.users().set_password(id, "123").await.is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_on_empty_table() {
        let db = test_db().await;
        let repo = db.users();

        assert!(repo.bootstrap_admin("admin123").await.unwrap().is_some());
        assert!(repo.bootstrap_admin("admin123").await.unwrap().is_none());

        let admin = repo.validate_credentials("admin", "admin123").await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
    }
}
