//! # Navigation
//!
//! Panels of the dashboard shell and the keys that reach them.
//!
//! ```text
//!   F1 ──► Dashboard      F3 ──► Reports
//!   F2 ──► Inventory      F4 ──► Settings
//!   Esc ─► logout         Enter ─► submit / refresh current panel
//! ```
//!
//! Esc at the login prompt, with nobody signed in, leaves the console.
//!
//! In the console the keys are typed as words: `f1`..`f4`, `esc`, `enter`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Dashboard,
    Inventory,
    Reports,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Dashboard,
        Panel::Inventory,
        Panel::Reports,
        Panel::Settings,
    ];

    pub const fn title(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Inventory => "Inventory",
            Panel::Reports => "Reports",
            Panel::Settings => "Settings",
        }
    }

    /// The function key bound to this panel.
    pub const fn key(&self) -> &'static str {
        match self {
            Panel::Dashboard => "F1",
            Panel::Inventory => "F2",
            Panel::Reports => "F3",
            Panel::Settings => "F4",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Panel {
    type Err = String;

    /// Accepts the panel title or its key, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Panel::ALL
            .into_iter()
            .find(|p| p.title().eq_ignore_ascii_case(wanted) || p.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown panel '{}'", wanted))
    }
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Navigate(Panel),
    Logout,
    Submit,
}

/// Maps a typed key name to its action. `None` for anything else.
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key.trim().to_ascii_lowercase().as_str() {
        "f1" => Some(KeyAction::Navigate(Panel::Dashboard)),
        "f2" => Some(KeyAction::Navigate(Panel::Inventory)),
        "f3" => Some(KeyAction::Navigate(Panel::Reports)),
        "f4" => Some(KeyAction::Navigate(Panel::Settings)),
        "esc" | "escape" => Some(KeyAction::Logout),
        "enter" | "return" => Some(KeyAction::Submit),
        _ => None,
    }
}
