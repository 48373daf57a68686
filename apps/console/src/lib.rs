//! # Stock Room Console Library
//!
//! Startup for the Stock Room console dashboard, plus the modules the
//! shell is built from.
//!
//! ## Module Organization
//! ```text
//! stockroom_console_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── db.rs       ◄─── DataSource wrapper (connected or demo)
//! │   ├── session.rs  ◄─── Signed-in user
//! │   └── config.rs   ◄─── Environment configuration
//! ├── commands/       ◄─── One module per panel
//! ├── navigation.rs   ◄─── Panels and F1-F4 / Esc / Enter
//! ├── view.rs         ◄─── Plain-text rendering
//! ├── shell.rs        ◄─── Read-parse-run loop
//! └── error.rs        ◄─── ApiError returned by commands
//! ```

pub mod commands;
pub mod error;
pub mod navigation;
pub mod shell;
pub mod state;
pub mod view;

use clap::{ArgAction, Parser};
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shell::Shell;
use state::{AppState, ConfigState, DbState, DEFAULT_ADMIN_PASSWORD};
use stockroom_db::DbConfig;

/// File name looked for in each candidate directory.
pub const DATABASE_FILE: &str = "StockRoom.db";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "stockroom", about = "Stock Room inventory console", version)]
struct Cli {
    #[arg(long, help = "Path to the SQLite database file")]
    db: Option<PathBuf>,

    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Create the database file if it does not exist"
    )]
    create_db: bool,

    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Refuse demo logins when no database is available"
    )]
    no_demo: bool,

    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Print command output as JSON"
    )]
    json: bool,

    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        help = "Log command activity to stderr"
    )]
    verbose: bool,
}

/// Runs the console until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. .env, environment (STOCKROOM_*), then command-line flags            │
/// │  2. Logging to stderr (RUST_LOG overrides)                              │
/// │  3. Database path: --db, ./StockRoom.db, ./Database/StockRoom.db,       │
/// │     platform data dir                                                   │
/// │  4. Probe the database: connected, or demo mode with the reason         │
/// │  5. Fresh database with no users gets an `admin` account                │
/// │  6. Shell on stdin/stdout                                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ConfigState::from_env();
    if let Some(path) = cli.db {
        config.db_path = Some(path);
    }
    config.create_db |= cli.create_db;
    if cli.no_demo {
        config.allow_demo_mode = false;
    }

    let db_path = resolve_database_path(
        config.db_path.as_deref(),
        &std::env::current_dir()?,
        platform_data_dir().as_deref(),
    );
    info!(?db_path, create = config.create_db, "Database path determined");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    let db_config = DbConfig::new(db_path).create_if_missing(config.create_db);
    let db = runtime.block_on(async {
        let db = DbState::connect(db_config).await;
        ensure_admin(&db, &config).await;
        db
    });

    info!(store = %config.store_name, "Starting Stock Room console");
    let mut shell = Shell::new(AppState::new(db, config), runtime, cli.json);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;
    Ok(())
}

/// Initializes the tracing subscriber on stderr, leaving stdout to the shell.
///
/// ## Log Levels
/// - Default: warnings only
/// - `--verbose`: INFO, DEBUG for stockroom crates
/// - `RUST_LOG` overrides both
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,stockroom=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn platform_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "stockroom", "StockRoom").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Picks the database file.
///
/// An explicit path always wins. Otherwise the first existing file among
/// `cwd/StockRoom.db`, `cwd/Database/StockRoom.db` and the platform data
/// directory; if none exists, `cwd/StockRoom.db`.
pub fn resolve_database_path(
    explicit: Option<&Path>,
    cwd: &Path,
    data_dir: Option<&Path>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let mut candidates = vec![
        cwd.join(DATABASE_FILE),
        cwd.join("Database").join(DATABASE_FILE),
    ];
    if let Some(dir) = data_dir {
        candidates.push(dir.join(DATABASE_FILE));
    }

    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => found.clone(),
        None => candidates.swap_remove(0),
    }
}

/// Gives a database without any users an `admin` account.
///
/// Password from [`ConfigState::bootstrap_admin_password`].
async fn ensure_admin(db: &DbState, config: &ConfigState) {
    let Ok(database) = db.database().await else {
        return;
    };

    let password = config.bootstrap_admin_password();
    match database.users().bootstrap_admin(password).await {
        Ok(Some(_)) if password == DEFAULT_ADMIN_PASSWORD => {
            warn!("Bootstrap admin uses the default password; change it")
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Could not create bootstrap admin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stockroom-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_explicit_path_wins() {
        let cwd = scratch("explicit");
        fs::write(cwd.join(DATABASE_FILE), b"").unwrap();

        let path = resolve_database_path(Some(Path::new("/data/other.db")), &cwd, None);
        assert_eq!(path, PathBuf::from("/data/other.db"));
    }

    #[test]
    fn test_finds_database_subdirectory() {
        let cwd = scratch("subdir");
        let nested = cwd.join("Database");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(DATABASE_FILE), b"").unwrap();

        assert_eq!(
            resolve_database_path(None, &cwd, None),
            nested.join(DATABASE_FILE)
        );

        fs::write(cwd.join(DATABASE_FILE), b"").unwrap();
        assert_eq!(
            resolve_database_path(None, &cwd, None),
            cwd.join(DATABASE_FILE)
        );
    }

    #[test]
    fn test_falls_back_to_data_dir_then_cwd() {
        let cwd = scratch("fallback-cwd");
        let data = scratch("fallback-data");

        assert_eq!(
            resolve_database_path(None, &cwd, Some(&data)),
            cwd.join(DATABASE_FILE)
        );

        fs::write(data.join(DATABASE_FILE), b"").unwrap();
        assert_eq!(
            resolve_database_path(None, &cwd, Some(&data)),
            data.join(DATABASE_FILE)
        );
    }

    #[tokio::test]
    async fn test_bootstrap_admin_uses_configured_password() {
        let db = DbState::connect(DbConfig::in_memory()).await;
        let config = ConfigState {
            admin_password: Some("from-config".to_string()),
            ..Default::default()
        };
        ensure_admin(&db, &config).await;

        let users = db.database().await.unwrap().users();
        assert!(users
            .validate_credentials("admin", "from-config")
            .await
            .unwrap()
            .is_some());
        assert!(users
            .validate_credentials("admin", DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["stockroom", "--db", "x.db", "--no-demo", "--json"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(cli.no_demo);
        assert!(cli.json);
        assert!(!cli.create_db);
    }
}
