//! Shared application state.
//!
//! DESIGN
//! ======
//! `PortalState` is built once at startup and handed to the rendering and
//! navigation layers by clone. Every field is a shared handle, so clones see
//! the same notification list and session. Teardown goes through
//! `shutdown`, which cancels pending notification timers.

use tracing::info;

use crate::config::{ConfigError, PortalConfig};
use crate::guard::{Decision, RouteGuard, ViewGroup};
use crate::notify::NotificationManager;
use crate::session::SessionStore;

// =============================================================================
// PORTAL STATE
// =============================================================================

/// Process-wide state container injected into views and route definitions.
#[derive(Clone, Debug)]
pub struct PortalState {
    pub notifications: NotificationManager,
    pub session: SessionStore,
    pub guard: RouteGuard,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            notifications: NotificationManager::from_config(&PortalConfig::default()),
            session: SessionStore::new(),
            guard: RouteGuard::default(),
        }
    }
}

impl PortalState {
    /// Build state from `config`. Fails when its routes do not validate.
    pub fn new(config: &PortalConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            notifications: NotificationManager::from_config(config),
            session: SessionStore::new(),
            guard: RouteGuard::new(config.routes.clone())?,
        })
    }

    /// Build state from `PORTAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = PortalConfig::from_env()?;
        info!(
            default_duration_ms = config.default_duration_ms,
            auth_path = %config.routes.auth_path,
            creator_root = %config.routes.creator_root,
            consumer_root = %config.routes.consumer_root,
            "portal state configured"
        );
        Self::new(&config)
    }

    /// Guard decision against the current session snapshot.
    #[must_use]
    pub fn decide(&self, group: ViewGroup) -> Decision {
        self.guard.decide(group, &self.session.session())
    }

    /// Classify `path` and decide against the current session snapshot.
    #[must_use]
    pub fn check_path(&self, path: &str) -> Decision {
        self.guard.check_path(path, &self.session.session())
    }

    pub fn shutdown(&self) {
        self.notifications.shutdown();
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
