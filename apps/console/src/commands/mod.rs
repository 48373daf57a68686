//! # Commands Module
//!
//! Every operation the shell can perform. Commands take the state they need,
//! return DTOs and fail with [`ApiError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (role guards)
//! ├── auth.rs       ◄─── login, logout, current_user
//! ├── dashboard.rs  ◄─── dashboard_stats
//! ├── inventory.rs  ◄─── item search/CRUD, stock movements
//! ├── catalog.rs    ◄─── categories, suppliers
//! ├── reports.rs    ◄─── low stock, reorder, valuation
//! └── settings.rs   ◄─── connection status, reconnect, users
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stockroom[Inventory]> items search pen --low-stock                     │
//! │         │                                                               │
//! │         │ (tokenize + clap)                                             │
//! │         ▼                                                               │
//! │  runtime.block_on(inventory::search_items(                              │
//! │      &state.db,          ◄── DataSource (connected or demo)             │
//! │      &state.session,     ◄── must be signed in                          │
//! │      &filter,                                                           │
//! │  )) -> Result<Vec<ItemDto>, ApiError>                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  view::items(...) or serde_json                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Role Gates
//! | Command group                | Needs        |
//! |------------------------------|--------------|
//! | reading anything             | signed in    |
//! | item/catalog/stock changes   | `can_edit`   |
//! | users, reconnect             | `is_admin`   |

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod inventory;
pub mod reports;
pub mod settings;

use crate::error::ApiError;
use crate::state::SessionState;
use stockroom_core::AuthenticatedUser;

/// Signed-in user whose role may change inventory.
pub(crate) fn require_editor(
    session: &SessionState,
    action: &str,
) -> Result<AuthenticatedUser, ApiError> {
    let user = session.require_user()?;
    user.ensure_can_edit(action)?;
    Ok(user)
}

/// Signed-in admin.
pub(crate) fn require_admin(
    session: &SessionState,
    action: &str,
) -> Result<AuthenticatedUser, ApiError> {
    let user = session.require_user()?;
    user.ensure_admin(action)?;
    Ok(user)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::state::{AppState, ConfigState, DbState};
    use stockroom_core::{AuthenticatedUser, NewCategory, NewSupplier, UserRole};
    use stockroom_db::{DataSource, DbConfig};

    /// State backed by a fresh in-memory database, nobody signed in.
    pub async fn connected() -> AppState {
        AppState::new(
            DbState::connect(DbConfig::in_memory()).await,
            ConfigState::default(),
        )
    }

    /// Demo-mode state.
    pub fn demo(allow_demo_mode: bool) -> AppState {
        AppState::new(
            DbState::new(DataSource::demo("test"), DbConfig::in_memory()),
            ConfigState {
                allow_demo_mode,
                ..Default::default()
            },
        )
    }

    /// Signs in a user with `role` without touching the users table.
    pub fn sign_in_as(state: &AppState, role: UserRole) {
        state.session.sign_in(AuthenticatedUser {
            id: None,
            username: format!("{}-tester", role).to_lowercase(),
            full_name: format!("{} Tester", role),
            role,
            last_login: None,
            demo: false,
        });
    }

    /// One category and one supplier.
    pub async fn seed_catalog(state: &AppState) -> (i64, i64) {
        let db = state.db.database().await.unwrap();
        let category = db
            .categories()
            .create(&NewCategory {
                name: "Office".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        let supplier = db
            .suppliers()
            .create(&NewSupplier {
                name: "Acme Wholesale".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (category, supplier)
    }
}
