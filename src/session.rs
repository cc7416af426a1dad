//! Session state: who is signed in, in which role, and the display theme.
//!
//! DESIGN
//! ======
//! `SessionStore` is the only writer. Readers take a `Session` snapshot or
//! follow a `watch` receiver. The stored `Session` keeps authentication as
//! `Option<CurrentUser>`, so "authenticated without a user" cannot be held
//! at all; the inconsistent pair can only appear in a `SessionUpdate`, and
//! `set_session` rejects it before touching state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::guard::ViewGroup;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("authenticated session requires a current user")]
    MissingUser,
    #[error("unauthenticated session must not carry a current user")]
    UnexpectedUser,
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingUser => "E_SESSION_MISSING_USER",
            Self::UnexpectedUser => "E_SESSION_UNEXPECTED_USER",
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Which dashboard area a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Consumer,
}

impl Role {
    /// View group a user of this role lands on after sign-in.
    #[must_use]
    pub fn landing_group(self) -> ViewGroup {
        match self {
            Role::Creator => ViewGroup::CreatorArea,
            Role::Consumer => ViewGroup::ConsumerArea,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Read-only session snapshot.
///
/// Serializes with a derived `is_authenticated` field next to `current_user`,
/// which is the shape renderers read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "SessionView")]
pub struct Session {
    current_user: Option<CurrentUser>,
    dark_mode: bool,
}

#[derive(Serialize)]
struct SessionView {
    is_authenticated: bool,
    current_user: Option<CurrentUser>,
    dark_mode: bool,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            is_authenticated: session.is_authenticated(),
            current_user: session.current_user,
            dark_mode: session.dark_mode,
        }
    }
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.current_user.map(|u| u.role)
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Build a snapshot directly. Used by route checks that do not go
    /// through a store.
    #[must_use]
    pub fn new(current_user: Option<CurrentUser>, dark_mode: bool) -> Self {
        Self { current_user, dark_mode }
    }
}

/// Wholesale replacement of the authentication fields, as supplied by the
/// sign-in flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SessionUpdate {
    pub is_authenticated: bool,
    pub current_user: Option<CurrentUser>,
}

impl SessionUpdate {
    #[must_use]
    pub fn signed_in(user: CurrentUser) -> Self {
        Self { is_authenticated: true, current_user: Some(user) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    fn validate(self) -> Result<Option<CurrentUser>, SessionError> {
        match (self.is_authenticated, self.current_user) {
            (true, Some(user)) => Ok(Some(user)),
            (false, None) => Ok(None),
            (true, None) => Err(SessionError::MissingUser),
            (false, Some(_)) => Err(SessionError::UnexpectedUser),
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared handle to the process-wide session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<watch::Sender<Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionStore").field(&self.session()).finish()
    }
}

impl SessionStore {
    /// Unauthenticated, light theme.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        let (tx, _) = watch::channel(session);
        Self { inner: Arc::new(Mutex::new(tx)) }
    }

    fn lock(&self) -> MutexGuard<'_, watch::Sender<Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot.
    #[must_use]
    pub fn session(&self) -> Session {
        *self.lock().borrow()
    }

    /// Replace the authentication fields. The dark-mode preference is kept.
    ///
    /// An inconsistent update is rejected and leaves the session unchanged.
    pub fn set_session(&self, update: SessionUpdate) -> Result<(), SessionError> {
        let current_user = update.validate().inspect_err(|e| {
            warn!(error = %e, "rejected inconsistent session update");
        })?;

        self.replace_user(current_user);
        Ok(())
    }

    pub fn sign_in(&self, user: CurrentUser) {
        self.replace_user(Some(user));
    }

    pub fn sign_out(&self) {
        self.replace_user(None);
    }

    fn replace_user(&self, current_user: Option<CurrentUser>) {
        let tx = self.lock();
        let previous = tx.borrow().role();
        tx.send_modify(|s| s.current_user = current_user);
        info!(
            authenticated = current_user.is_some(),
            role = ?current_user.map(|u| u.role),
            previous_role = ?previous,
            "session updated"
        );
    }

    /// Set the display preference. Authentication fields are untouched.
    pub fn set_dark_mode(&self, enabled: bool) {
        self.lock().send_if_modified(|s| {
            let changed = s.dark_mode != enabled;
            s.dark_mode = enabled;
            changed
        });
    }

    /// Flip the display preference and return the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        let tx = self.lock();
        let mut next = false;
        tx.send_modify(|s| {
            s.dark_mode = !s.dark_mode;
            next = s.dark_mode;
        });
        next
    }

    /// Receiver that yields a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.lock().subscribe()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
