//! # Credentials
//!
//! Password hashing for stored accounts and the fixed demo account table.
//!
//! ## Two Paths
//! ```text
//!   username + password
//!          │
//!          ▼
//!   ┌──────────────┐  connected   ┌───────────────────────────────┐
//!   │  DataSource  │─────────────►│ users row → verify_password() │
//!   │              │              │ (Argon2 PHC string)           │
//!   │              │  demo        ├───────────────────────────────┤
//!   │              │─────────────►│ authenticate_demo()           │
//!   └──────────────┘              │ (salted SHA-256 digests)      │
//!                                 └───────────────────────────────┘
//! ```
//!
//! Demo passwords never appear in plaintext; only their digests are
//! compiled in.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};
use crate::types::{User, UserRole};

// =============================================================================
// Session Identity
// =============================================================================

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// `None` for demo accounts, which have no row.
    pub id: Option<i64>,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub last_login: Option<DateTime<Utc>>,
    pub demo: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        AuthenticatedUser {
            id: Some(user.id),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            last_login: user.last_login,
            demo: false,
        }
    }
}

impl AuthenticatedUser {
    /// Fails unless the role may change inventory.
    pub fn ensure_can_edit(&self, action: &str) -> CoreResult<()> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(self.denied(action))
        }
    }

    /// Fails unless the role is Admin.
    pub fn ensure_admin(&self, action: &str) -> CoreResult<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(self.denied(action))
        }
    }

    fn denied(&self, action: &str) -> CoreError {
        CoreError::PermissionDenied {
            role: self.role.to_string(),
            action: action.to_string(),
        }
    }
}

// =============================================================================
// Stored Passwords
// =============================================================================

/// Hashes a password into an Argon2 PHC string for storage.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string. A malformed hash never
/// matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Demo Accounts
// =============================================================================

const DEMO_SALT: &str = "stockroom-demo";

/// A built-in account usable while no database is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub username: &'static str,
    pub full_name: &'static str,
    pub role: UserRole,
    /// Lowercase hex SHA-256 of `"{username}:{password}:stockroom-demo"`.
    pub digest: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        username: "admin",
        full_name: "Demo Administrator",
        role: UserRole::Admin,
        digest: "424a05f052dbbffdff3088d99dc1f8b2e39761bfdc180282eaffd50d39cb4c68",
    },
    DemoAccount {
        username: "user1",
        full_name: "Demo User",
        role: UserRole::User,
        digest: "54e3356b2fb4b3fb233c472df8675879f7745f5de0f62c0a38235b2e9c6192be",
    },
    DemoAccount {
        username: "manager",
        full_name: "Demo Manager",
        role: UserRole::Manager,
        digest: "8be35261d6959a655056168aeac32b963274c40e719d2b7478b17a3ecb8d80d1",
    },
];

/// Salted digest used for the demo table.
pub fn demo_digest(username: &str, password: &str) -> String {
    format!(
        "{:x}",
        Sha256::digest(format!("{username}:{password}:{DEMO_SALT}").as_bytes())
    )
}

/// Checks a username/password pair against the demo table.
///
/// Usernames are matched exactly, as stored accounts are.
pub fn authenticate_demo(username: &str, password: &str) -> Option<AuthenticatedUser> {
    let account = DEMO_ACCOUNTS.iter().find(|a| a.username == username)?;

    if demo_digest(username, password) != account.digest {
        return None;
    }

    Some(AuthenticatedUser {
        id: None,
        username: account.username.to_string(),
        full_name: account.full_name.to_string(),
        role: account.role,
        last_login: Some(Utc::now()),
        demo: true,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts_accept_their_passwords() {
        let admin = authenticate_demo("admin", "admin123").unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.full_name, "Demo Administrator");
        assert!(admin.demo);
        assert_eq!(admin.id, None);

        let user = authenticate_demo("user1", "user123").unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.full_name, "Demo User");

        let manager = authenticate_demo("manager", "manager123").unwrap();
        assert_eq!(manager.role, UserRole::Manager);
        assert_eq!(manager.full_name, "Demo Manager");
    }

    #[test]
    fn test_demo_accounts_reject_everything_else() {
        assert!(authenticate_demo("admin", "wrong").is_none());
        assert!(authenticate_demo("admin", "user123").is_none());
        assert!(authenticate_demo("ADMIN", "admin123").is_none());
        assert!(authenticate_demo("ghost", "admin123").is_none());
        assert!(authenticate_demo("", "").is_none());
    }

    #[test]
    fn test_demo_digests_match_table() {
        for (account, password) in DEMO_ACCOUNTS
            .iter()
            .zip(["admin123", "user123", "manager123"])
        {
            assert_eq!(demo_digest(account.username, password), account.digest);
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("s3cret", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_role_gates() {
        let mut viewer = authenticate_demo("user1", "user123").unwrap();
        assert!(viewer.ensure_can_edit("create items").is_ok());
        assert!(viewer.ensure_admin("create users").is_err());

        viewer.role = UserRole::Viewer;
        let err = viewer.ensure_can_edit("create items").unwrap_err();
        assert_eq!(err.to_string(), "Role Viewer is not allowed to create items");
    }
}
