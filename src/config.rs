//! Portal configuration parsed from environment variables.
//!
//! Optional:
//! - `PORTAL_NOTIFY_DEFAULT_MS`: default notification lifetime, default 5000
//! - `PORTAL_AUTH_PATH`: sign-in view, default `/login`
//! - `PORTAL_CREATOR_ROOT`: creator landing view, default `/creator/dashboard`
//! - `PORTAL_CONSUMER_ROOT`: consumer landing view, default `/consumer/dashboard`

use tracing::warn;

use crate::error::ErrorCode;

pub const DEFAULT_NOTIFY_DURATION_MS: u64 = 5000;
pub const DEFAULT_AUTH_PATH: &str = "/login";
pub const DEFAULT_CREATOR_ROOT: &str = "/creator/dashboard";
pub const DEFAULT_CONSUMER_ROOT: &str = "/consumer/dashboard";

const AUTH_VAR: &str = "PORTAL_AUTH_PATH";
const CREATOR_VAR: &str = "PORTAL_CREATOR_ROOT";
const CONSUMER_VAR: &str = "PORTAL_CONSUMER_ROOT";

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an absolute path starting with '/', got '{value}'")]
    RelativePath { var: &'static str, value: String },
    #[error("{first} and {second} resolve to the same path '{path}'")]
    DuplicatePath { first: &'static str, second: &'static str, path: String },
    #[error("{inner} path '{path}' falls inside the views claimed by {outer}")]
    NestedPath { inner: &'static str, outer: &'static str, path: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RelativePath { .. } => "E_CONFIG_RELATIVE_PATH",
            Self::DuplicatePath { .. } => "E_CONFIG_DUPLICATE_PATH",
            Self::NestedPath { .. } => "E_CONFIG_NESTED_PATH",
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Landing paths used by the route guard when it redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub auth_path: String,
    pub creator_root: String,
    pub consumer_root: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            creator_root: DEFAULT_CREATOR_ROOT.to_string(),
            consumer_root: DEFAULT_CONSUMER_ROOT.to_string(),
        }
    }
}

impl RouteConfig {
    /// Check that every path is absolute and that the three view groups claim
    /// disjoint path ranges.
    ///
    /// A group's range is the auth path itself, or an area prefix (see
    /// [`RouteConfig::area_prefixes`]). Overlapping ranges would classify one
    /// group's landing path as another group and redirect it to itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            (AUTH_VAR, self.auth_path.as_str()),
            (CREATOR_VAR, self.creator_root.as_str()),
            (CONSUMER_VAR, self.consumer_root.as_str()),
        ];

        for (var, value) in paths {
            if !value.starts_with('/') {
                return Err(ConfigError::RelativePath { var, value: value.to_string() });
            }
        }

        for (i, (first, a)) in paths.iter().enumerate() {
            for (second, b) in &paths[i + 1..] {
                if a == b {
                    return Err(ConfigError::DuplicatePath { first: *first, second: *second, path: (*a).to_string() });
                }
            }
        }

        let (creator_prefix, consumer_prefix) = self.area_prefixes();
        let ranges = [(AUTH_VAR, self.auth_path.as_str()), (CREATOR_VAR, creator_prefix), (CONSUMER_VAR, consumer_prefix)];
        for (i, (first, a)) in ranges.iter().enumerate() {
            for (second, b) in &ranges[i + 1..] {
                if under(a, b) {
                    return Err(ConfigError::NestedPath { inner: *first, outer: *second, path: (*a).to_string() });
                }
                if under(b, a) {
                    return Err(ConfigError::NestedPath { inner: *second, outer: *first, path: (*b).to_string() });
                }
            }
        }

        Ok(())
    }

    /// Path prefixes that classify the creator and consumer areas.
    ///
    /// Normally the first segment of each root. When both roots share a first
    /// segment (`/app/creator`, `/app/consumer`) the full roots are used.
    pub(crate) fn area_prefixes(&self) -> (&str, &str) {
        let creator = first_segment(&self.creator_root);
        let consumer = first_segment(&self.consumer_root);
        if creator == consumer {
            (&self.creator_root, &self.consumer_root)
        } else {
            (creator, consumer)
        }
    }
}

/// Top-level configuration for a [`crate::state::PortalState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Lifetime applied by `show` when the caller leaves `duration_ms` unset.
    pub default_duration_ms: u64,
    pub routes: RouteConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self { default_duration_ms: DEFAULT_NOTIFY_DURATION_MS, routes: RouteConfig::default() }
    }
}

impl PortalConfig {
    /// Build typed config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// `from_env` is this with `std::env::var`. Tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_duration_ms = parse_or_default(&lookup, "PORTAL_NOTIFY_DEFAULT_MS", DEFAULT_NOTIFY_DURATION_MS);

        let routes = RouteConfig {
            auth_path: path_or_default(&lookup, AUTH_VAR, DEFAULT_AUTH_PATH),
            creator_root: path_or_default(&lookup, CREATOR_VAR, DEFAULT_CREATOR_ROOT),
            consumer_root: path_or_default(&lookup, CONSUMER_VAR, DEFAULT_CONSUMER_ROOT),
        };
        routes.validate()?;

        Ok(Self { default_duration_ms, routes })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    if let Ok(value) = raw.trim().parse::<T>() {
        value
    } else {
        warn!(key, value = %raw, "unparseable config value; using default");
        default
    }
}

fn path_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default.to_string();
    };
    let path = raw.trim().trim_end_matches('/');
    if path.is_empty() {
        warn!(key, value = %raw, "empty config path; using default");
        return default.to_string();
    }
    path.to_string()
}

/// `true` when `path` equals `prefix` or sits below it on a segment boundary.
pub(crate) fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// `/creator/dashboard` -> `/creator`.
fn first_segment(path: &str) -> &str {
    match path.get(1..).and_then(|rest| rest.find('/')) {
        Some(i) => &path[..=i],
        None => path,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
