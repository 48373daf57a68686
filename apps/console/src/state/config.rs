//! # Configuration State
//!
//! Stores application configuration resolved at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. CLI flags (`--db`, `--create-db`, `--no-demo`)
//! 2. Environment variables (`STOCKROOM_*`), including a `.env` file
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stockroom_core::Money;

/// Password given to the bootstrap admin when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the shell banner)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Explicit database file. `None` means search the usual places.
    pub db_path: Option<PathBuf>,

    /// Create the database file when it does not exist instead of
    /// entering demo mode.
    pub create_db: bool,

    /// Accept the built-in demo accounts when no database is available.
    pub allow_demo_mode: bool,

    /// Rows shown by `movements` when no limit is given.
    pub recent_movement_limit: u32,

    /// Password for the admin created in a database without users.
    /// Never serialized.
    #[serde(skip)]
    pub admin_password: Option<String>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Stock Room"
    /// - Currency: $
    /// - Database: searched for
    /// - Demo mode: allowed
    fn default() -> Self {
        ConfigState {
            store_name: "Stock Room".to_string(),
            currency_symbol: "$".to_string(),
            db_path: None,
            create_db: false,
            allow_demo_mode: true,
            recent_movement_limit: 20,
            admin_password: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKROOM_DB_PATH`: Database file
    /// - `STOCKROOM_CREATE_DB`: Create the file if missing (`1`/`true`/`yes`)
    /// - `STOCKROOM_ALLOW_DEMO`: Allow demo accounts (`0`/`false`/`no` disables)
    /// - `STOCKROOM_STORE_NAME`: Override store name
    /// - `STOCKROOM_CURRENCY_SYMBOL`: Override currency symbol
    /// - `STOCKROOM_ADMIN_PASSWORD`: Bootstrap admin password
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("STOCKROOM_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("STOCKROOM_CREATE_DB").and_then(|v| parse_flag(&v)) {
            config.create_db = flag;
        }

        if let Some(flag) = lookup("STOCKROOM_ALLOW_DEMO").and_then(|v| parse_flag(&v)) {
            config.allow_demo_mode = flag;
        }

        if let Some(store_name) = lookup("STOCKROOM_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("STOCKROOM_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(password) = lookup("STOCKROOM_ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
            config.admin_password = Some(password);
        }

        config
    }

    /// The configured bootstrap admin password, or [`DEFAULT_ADMIN_PASSWORD`].
    pub fn bootstrap_admin_password(&self) -> &str {
        self.admin_password.as_deref().unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        Money::from_cents(cents).format_with(&self.currency_symbol)
    }
}

/// Unrecognised values are ignored rather than treated as false.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        let config = ConfigState {
            currency_symbol: "£".to_string(),
            ..Default::default()
        };
        assert_eq!(config.format_currency(250), "£2.50");
    }

    #[test]
    fn test_no_variables_gives_defaults() {
        assert_eq!(ConfigState::from_lookup(lookup(&[])), ConfigState::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("STOCKROOM_DB_PATH", "/srv/stock/StockRoom.db"),
            ("STOCKROOM_CREATE_DB", "yes"),
            ("STOCKROOM_ALLOW_DEMO", "0"),
            ("STOCKROOM_STORE_NAME", "Back Office"),
        ]));

        assert_eq!(config.db_path, Some(PathBuf::from("/srv/stock/StockRoom.db")));
        assert!(config.create_db);
        assert!(!config.allow_demo_mode);
        assert_eq!(config.store_name, "Back Office");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.bootstrap_admin_password(), DEFAULT_ADMIN_PASSWORD);
    }

    #[test]
    fn test_admin_password_from_variables_is_not_serialized() {
        let config = ConfigState::from_lookup(lookup(&[(
            "STOCKROOM_ADMIN_PASSWORD",
            "s3cret-pass",
        )]));
        assert_eq!(config.bootstrap_admin_password(), "s3cret-pass");

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cret-pass"));

        let blank = ConfigState::from_lookup(lookup(&[("STOCKROOM_ADMIN_PASSWORD", "")]));
        assert_eq!(blank.bootstrap_admin_password(), DEFAULT_ADMIN_PASSWORD);
    }

    #[test]
    fn test_unrecognised_flag_is_ignored() {
        let config = ConfigState::from_lookup(lookup(&[
            ("STOCKROOM_ALLOW_DEMO", "maybe"),
            ("STOCKROOM_DB_PATH", "  "),
        ]));
        assert!(config.allow_demo_mode);
        assert!(config.db_path.is_none());
    }
}
