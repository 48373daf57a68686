//! # Auth Commands
//!
//! Login, logout and the current session.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login <username> <password>                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Both fields present? ── no ──► ValidationError (no I/O)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐       ┌──────────────────────────────┐   │
//! │  │ Connected                │       │ Demo mode                    │   │
//! │  │ users.validate_credentials│      │ allowed by config?           │   │
//! │  │ (Argon2, last_login)     │       │ authenticate_demo (SHA-256)  │   │
//! │  └────────────┬─────────────┘       └──────────────┬───────────────┘   │
//! │               └────────────────┬───────────────────┘                   │
//! │                                ▼                                        │
//! │               Some(user) → session.sign_in    None → InvalidCredentials │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DbState, SessionState};
use stockroom_core::auth::authenticate_demo;
use stockroom_core::validation::validate_credentials_present;
use stockroom_core::{AuthenticatedUser, CoreError};

/// The signed-in user as shown to the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub id: Option<i64>,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub can_edit: bool,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub demo: bool,
}

impl From<AuthenticatedUser> for SessionUserDto {
    fn from(user: AuthenticatedUser) -> Self {
        SessionUserDto {
            id: user.id,
            can_edit: user.role.can_edit(),
            is_admin: user.role.is_admin(),
            role: user.role.to_string(),
            username: user.username,
            full_name: user.full_name,
            last_login: user.last_login,
            demo: user.demo,
        }
    }
}

/// Checks credentials and starts a session.
///
/// ## Errors
/// * `ValidationError` - username or password blank
/// * `InvalidCredentials` - no matching active account
/// * `DemoMode` - no database and demo accounts are disabled
pub async fn login(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    username: &str,
    password: &str,
) -> Result<SessionUserDto, ApiError> {
    let username = username.trim();
    validate_credentials_present(username, password)?;

    debug!(username = %username, "login command");

    let user = if db.is_demo().await {
        if !config.allow_demo_mode {
            warn!(username = %username, "Login refused, demo accounts disabled");
            return Err(ApiError::new(
                ErrorCode::DemoMode,
                "No database is available and demo accounts are disabled",
            ));
        }
        authenticate_demo(username, password)
    } else {
        db.database()
            .await?
            .users()
            .validate_credentials(username, password)
            .await?
            .map(|u| AuthenticatedUser::from(&u))
    };

    let Some(user) = user else {
        warn!(username = %username, "Login failed");
        return Err(CoreError::InvalidCredentials.into());
    };

    info!(
        username = %user.username,
        role = %user.role,
        demo = user.demo,
        "User logged in"
    );
    session.sign_in(user.clone());
    Ok(SessionUserDto::from(user))
}

/// Ends the session. Returns who was signed in, if anyone.
pub fn logout(session: &SessionState) -> Option<SessionUserDto> {
    let previous = session.sign_out();
    if let Some(user) = &previous {
        info!(username = %user.username, "User logged out");
    }
    previous.map(SessionUserDto::from)
}

pub fn current_user(session: &SessionState) -> Option<SessionUserDto> {
    session.current().map(SessionUserDto::from)
}
