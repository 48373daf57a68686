//! # Session State
//!
//! Who is signed in. Empty until `login` succeeds and again after `logout`.
//!
//! Wrapped in `Arc<Mutex<T>>` so the session can be shared with anything
//! that outlives a single command.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;
use stockroom_core::AuthenticatedUser;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Arc<Mutex<Option<AuthenticatedUser>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning cannot leave the Option half-written.
    fn lock(&self) -> MutexGuard<'_, Option<AuthenticatedUser>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces any current user.
    pub fn sign_in(&self, user: AuthenticatedUser) {
        *self.lock() = Some(user);
    }

    /// Clears the session, returning who was signed in.
    pub fn sign_out(&self) -> Option<AuthenticatedUser> {
        self.lock().take()
    }

    pub fn current(&self) -> Option<AuthenticatedUser> {
        self.lock().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock().is_some()
    }

    /// The signed-in user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<AuthenticatedUser, ApiError> {
        self.current().ok_or_else(ApiError::not_authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockroom_core::auth::authenticate_demo;

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionState::new();
        assert!(!session.is_signed_in());
        assert_eq!(
            session.require_user().unwrap_err().code,
            ErrorCode::NotAuthenticated
        );

        session.sign_in(authenticate_demo("manager", "manager123").unwrap());
        assert_eq!(session.require_user().unwrap().username, "manager");

        let previous = session.sign_out().unwrap();
        assert_eq!(previous.full_name, "Demo Manager");
        assert!(session.current().is_none());
    }

    #[test]
    fn test_clones_share_the_session() {
        let session = SessionState::new();
        let other = session.clone();
        session.sign_in(authenticate_demo("user1", "user123").unwrap());
        assert!(other.is_signed_in());
    }
}
