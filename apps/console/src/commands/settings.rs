//! # Settings Commands
//!
//! The F4 panel: connection status and user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commands::require_admin;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use stockroom_core::{NewUser, RecordStatus, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusDto {
    pub connected: bool,
    pub message: String,
    pub database_path: String,
    pub allow_demo_mode: bool,
    pub store_name: String,
}

/// A stored account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        UserDto {
            id: u.id,
            role: u.role.to_string(),
            active: u.status == RecordStatus::Active,
            username: u.username,
            full_name: u.full_name,
            email: u.email,
            phone: u.phone,
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}

/// Where data is coming from. Works signed out, so the login screen can
/// show it.
pub async fn connection_status(db: &DbState, config: &ConfigState) -> ConnectionStatusDto {
    ConnectionStatusDto {
        connected: !db.is_demo().await,
        message: db.status_message().await,
        database_path: db.config().database_path.display().to_string(),
        allow_demo_mode: config.allow_demo_mode,
        store_name: config.store_name.clone(),
    }
}

/// Probes the database again.
///
/// A demo session does not survive gaining a real database: its user has
/// no row, so it is signed out.
pub async fn reconnect(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<ConnectionStatusDto, ApiError> {
    let user = require_admin(session, "reconnect the database")?;

    let message = db.reconnect().await;
    info!(user = %user.username, status = %message, "Database reconnected");

    if user.demo && !db.is_demo().await {
        warn!(username = %user.username, "Demo session ended by reconnect");
        session.sign_out();
    }
    Ok(connection_status(db, config).await)
}

/// Every account, by full name.
pub async fn list_users(db: &DbState, session: &SessionState) -> Result<Vec<UserDto>, ApiError> {
    require_admin(session, "manage users")?;
    let users = db.database().await?.users().list().await?;
    Ok(users.into_iter().map(UserDto::from).collect())
}

pub async fn create_user(
    db: &DbState,
    session: &SessionState,
    user: NewUser,
) -> Result<UserDto, ApiError> {
    let admin = require_admin(session, "manage users")?;
    let db = db.database().await?;

    let id = db.users().create(&user).await?;
    info!(id, username = %user.username, role = %user.role, by = %admin.username, "User created");

    db.users()
        .get_by_username(user.username.trim())
        .await?
        .map(UserDto::from)
        .ok_or_else(|| ApiError::not_found("User", &user.username))
}
