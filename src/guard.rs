//! Route guard: maps a requested view group and the session to allow/redirect.
//!
//! DESIGN
//! ======
//! `RouteGuard::decide` is a pure function of its inputs plus the immutable
//! landing paths it was built with. It never reads the session store itself;
//! the navigation layer passes a snapshot in.
//!
//! Rules:
//! - `Public`: always allowed.
//! - `Auth`: allowed when signed out; a signed-in user goes to their role's root.
//! - `CreatorArea` / `ConsumerArea`: signed-out users go to the auth view, a
//!   role mismatch goes to the user's own root, otherwise allowed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, RouteConfig, under};
use crate::session::{Role, Session};

/// Top-level groups of views that share an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewGroup {
    Auth,
    CreatorArea,
    ConsumerArea,
    Public,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Redirect { to: String },
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Redirect { to } => Some(to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    routes: RouteConfig,
    creator_prefix: String,
    consumer_prefix: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::from_valid(RouteConfig::default())
    }
}

impl RouteGuard {
    /// Build a guard over `routes`, rejecting configs that
    /// [`RouteConfig::validate`] refuses.
    pub fn new(routes: RouteConfig) -> Result<Self, ConfigError> {
        routes.validate()?;
        Ok(Self::from_valid(routes))
    }

    fn from_valid(routes: RouteConfig) -> Self {
        let (creator_prefix, consumer_prefix) = routes.area_prefixes();
        let (creator_prefix, consumer_prefix) = (creator_prefix.to_string(), consumer_prefix.to_string());
        Self { routes, creator_prefix, consumer_prefix }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }

    /// Root path of the area a role lands on.
    #[must_use]
    pub fn landing_path(&self, role: Role) -> &str {
        match role {
            Role::Creator => &self.routes.creator_root,
            Role::Consumer => &self.routes.consumer_root,
        }
    }

    /// Decide whether `session` may enter `group`.
    #[must_use]
    pub fn decide(&self, group: ViewGroup, session: &Session) -> Decision {
        let decision = match (group, session.role()) {
            (ViewGroup::Public, _) | (ViewGroup::Auth, None) => Decision::Allow,
            (ViewGroup::Auth, Some(role)) => redirect(self.landing_path(role)),
            (ViewGroup::CreatorArea | ViewGroup::ConsumerArea, None) => redirect(&self.routes.auth_path),
            (area, Some(role)) if role.landing_group() == area => Decision::Allow,
            (_, Some(role)) => redirect(self.landing_path(role)),
        };

        if let Decision::Redirect { to } = &decision {
            debug!(?group, role = ?session.role(), to = %to, "route guard redirect");
        }
        decision
    }

    /// Classify a concrete path into its view group.
    ///
    /// Query strings, fragments and trailing slashes are ignored. Validated
    /// routes give each group a disjoint range, so at most one branch matches;
    /// anything unmatched is public.
    #[must_use]
    pub fn group_for_path(&self, path: &str) -> ViewGroup {
        let path = normalize(path);
        if under(path, &self.routes.auth_path) {
            ViewGroup::Auth
        } else if under(path, &self.creator_prefix) {
            ViewGroup::CreatorArea
        } else if under(path, &self.consumer_prefix) {
            ViewGroup::ConsumerArea
        } else {
            ViewGroup::Public
        }
    }

    /// Classify `path` and decide in one step.
    #[must_use]
    pub fn check_path(&self, path: &str, session: &Session) -> Decision {
        self.decide(self.group_for_path(path), session)
    }
}

fn redirect(to: &str) -> Decision {
    Decision::Redirect { to: to.to_string() }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
