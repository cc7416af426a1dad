use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// PortalConfig::from_lookup
// =============================================================================

#[test]
fn from_lookup_empty_uses_defaults() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, PortalConfig::default());
    assert_eq!(cfg.default_duration_ms, DEFAULT_NOTIFY_DURATION_MS);
    assert_eq!(cfg.routes.auth_path, DEFAULT_AUTH_PATH);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_NOTIFY_DEFAULT_MS", "2500"),
        ("PORTAL_AUTH_PATH", "/auth/sign-in"),
        ("PORTAL_CREATOR_ROOT", "/studio/"),
        ("PORTAL_CONSUMER_ROOT", " /feed "),
    ]))
    .unwrap();

    assert_eq!(cfg.default_duration_ms, 2500);
    assert_eq!(cfg.routes.auth_path, "/auth/sign-in");
    assert_eq!(cfg.routes.creator_root, "/studio");
    assert_eq!(cfg.routes.consumer_root, "/feed");
}

#[test]
fn from_lookup_bad_number_falls_back_to_default() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_NOTIFY_DEFAULT_MS", "soon")])).unwrap();
    assert_eq!(cfg.default_duration_ms, DEFAULT_NOTIFY_DURATION_MS);
}

#[test]
fn from_lookup_negative_number_falls_back_to_default() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_NOTIFY_DEFAULT_MS", "-1")])).unwrap();
    assert_eq!(cfg.default_duration_ms, DEFAULT_NOTIFY_DURATION_MS);
}

#[test]
fn from_lookup_zero_duration_is_allowed() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_NOTIFY_DEFAULT_MS", "0")])).unwrap();
    assert_eq!(cfg.default_duration_ms, 0);
}

#[test]
fn from_lookup_blank_path_uses_default() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_AUTH_PATH", "   ")])).unwrap();
    assert_eq!(cfg.routes.auth_path, DEFAULT_AUTH_PATH);
}

#[test]
fn from_lookup_root_only_path_uses_default() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_AUTH_PATH", "/"), ("PORTAL_CREATOR_ROOT", "//")])).unwrap();
    assert_eq!(cfg.routes.auth_path, DEFAULT_AUTH_PATH);
    assert_eq!(cfg.routes.creator_root, DEFAULT_CREATOR_ROOT);
}

#[test]
fn from_lookup_relative_path_errors() {
    let err = PortalConfig::from_lookup(lookup_from(&[("PORTAL_CREATOR_ROOT", "creator")])).unwrap_err();
    assert_eq!(err, ConfigError::RelativePath { var: "PORTAL_CREATOR_ROOT", value: "creator".into() });
    assert_eq!(err.error_code(), "E_CONFIG_RELATIVE_PATH");
    assert!(err.to_string().contains("PORTAL_CREATOR_ROOT"));
}

#[test]
fn from_lookup_duplicate_paths_error() {
    let err = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_CREATOR_ROOT", "/home"),
        ("PORTAL_CONSUMER_ROOT", "/home"),
    ]))
    .unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_DUPLICATE_PATH");
    assert!(err.to_string().contains("/home"));
}

// =============================================================================
// RouteConfig::validate
// =============================================================================

#[test]
fn route_config_default_is_valid() {
    assert!(RouteConfig::default().validate().is_ok());
}

#[test]
fn route_config_auth_path_must_differ_from_roots() {
    let routes = RouteConfig { auth_path: "/creator/dashboard".into(), ..RouteConfig::default() };
    assert!(matches!(routes.validate(), Err(ConfigError::DuplicatePath { first: "PORTAL_AUTH_PATH", .. })));
}

#[test]
fn from_lookup_rejects_auth_path_over_area_prefix() {
    let err = PortalConfig::from_lookup(lookup_from(&[("PORTAL_AUTH_PATH", "/creator")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::NestedPath { inner: "PORTAL_AUTH_PATH", outer: "PORTAL_CREATOR_ROOT", path: "/creator".into() }
    );
    assert_eq!(err.error_code(), "E_CONFIG_NESTED_PATH");
}

#[test]
fn from_lookup_rejects_root_nested_in_other_root() {
    let err = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_CREATOR_ROOT", "/app"),
        ("PORTAL_CONSUMER_ROOT", "/app/consumer"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::NestedPath { inner: "PORTAL_CONSUMER_ROOT", outer: "PORTAL_CREATOR_ROOT", .. }));
}

#[test]
fn route_config_auth_path_under_area_is_nested() {
    let routes = RouteConfig { auth_path: "/consumer/login".into(), ..RouteConfig::default() };
    assert!(matches!(
        routes.validate(),
        Err(ConfigError::NestedPath { inner: "PORTAL_AUTH_PATH", outer: "PORTAL_CONSUMER_ROOT", .. })
    ));
}

#[test]
fn route_config_area_prefix_equal_to_auth_path_is_nested() {
    // Creator prefix becomes `/login`, the same range as the auth view.
    let routes = RouteConfig { creator_root: "/login/creator".into(), ..RouteConfig::default() };
    assert_eq!(
        routes.validate(),
        Err(ConfigError::NestedPath { inner: "PORTAL_AUTH_PATH", outer: "PORTAL_CREATOR_ROOT", path: "/login".into() })
    );
}

#[test]
fn route_config_empty_path_is_relative() {
    let routes = RouteConfig { consumer_root: String::new(), ..RouteConfig::default() };
    assert!(matches!(routes.validate(), Err(ConfigError::RelativePath { var: "PORTAL_CONSUMER_ROOT", .. })));
}

#[test]
fn area_prefixes_use_first_segment_or_full_roots() {
    assert_eq!(RouteConfig::default().area_prefixes(), ("/creator", "/consumer"));
    let shared = RouteConfig {
        creator_root: "/app/creator".into(),
        consumer_root: "/app/consumer".into(),
        ..RouteConfig::default()
    };
    assert_eq!(shared.area_prefixes(), ("/app/creator", "/app/consumer"));
}

// =============================================================================
// PortalConfig::from_env
// =============================================================================

/// Removes an env var on drop, so a failed assert does not leak it.
struct EnvVarGuard(&'static str);

impl EnvVarGuard {
    fn set(key: &'static str, value: &str) -> Self {
        unsafe { std::env::set_var(key, value) };
        Self(key)
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(self.0) };
    }
}

#[test]
fn from_env_reads_process_environment() {
    // Only asserts on a key no other test touches.
    let _var = EnvVarGuard::set("PORTAL_CONSUMER_ROOT", "/consumer/home");
    let cfg = PortalConfig::from_env().unwrap();
    assert_eq!(cfg.routes.consumer_root, "/consumer/home");
}
