//! # State Module
//!
//! Application state for the console shell.
//!
//! Each concern has its own state type, and commands take only the ones
//! they need. [`AppState`] owns one of each for the life of the process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │ SessionState │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  RwLock<     │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │  DataSource> │  │  Option<User>│  │  currency        │              │
//! │  │              │  │  >>          │  │  allow_demo_mode │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: written only by `reconnect`                                │
//! │  • SessionState: Arc<Mutex<T>> for exclusive access                    │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::{ConfigState, DEFAULT_ADMIN_PASSWORD};
pub use db::DbState;
pub use session::SessionState;

/// Everything a running shell holds.
#[derive(Debug)]
pub struct AppState {
    pub db: DbState,
    pub session: SessionState,
    pub config: ConfigState,
}

impl AppState {
    pub fn new(db: DbState, config: ConfigState) -> Self {
        AppState {
            db,
            session: SessionState::new(),
            config,
        }
    }
}
