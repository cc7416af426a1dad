//! # portal-core
//!
//! Client-side state core for the creator/consumer content portal.
//!
//! This crate holds the parts of the portal that carry behavior rather than
//! markup: transient notifications with auto-expiry, the session container
//! (authentication, role, theme), and the route guard that decides which
//! view group a session may enter. Pages and components consume these
//! through [`state::PortalState`].

pub mod config;
pub mod error;
pub mod guard;
pub mod notify;
pub mod session;
pub mod state;

pub use config::{ConfigError, PortalConfig, RouteConfig};
pub use error::ErrorCode;
pub use guard::{Decision, RouteGuard, ViewGroup};
pub use notify::{Notification, NotificationId, NotificationInput, NotificationManager, NotifyError, Severity};
pub use session::{CurrentUser, Role, Session, SessionError, SessionStore, SessionUpdate};
pub use state::PortalState;
