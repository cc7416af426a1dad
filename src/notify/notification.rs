//! Core notification data structures.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Unique identifier for a notification.
///
/// Allocated by the owning [`super::NotificationManager`] from a monotonic
/// counter, so an id is never handed out twice by the same manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.0)
    }
}

/// Visual category of a notification. Has no effect on its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// Caller-supplied fields for [`super::NotificationManager::show`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationInput {
    pub title: Option<String>,
    pub message: String,
    pub severity: Severity,
    /// `None` applies the manager default; `Some(0)` persists until dismissed.
    pub duration_ms: Option<i64>,
}

impl NotificationInput {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { title: None, message: message.into(), severity, duration_ms: None }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override the auto-dismiss delay. Negative values are rejected by `show`.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Keep the notification until it is dismissed explicitly.
    #[must_use]
    pub fn persistent(self) -> Self {
        self.with_duration_ms(0)
    }
}

/// A notification currently held by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    pub severity: Severity,
    /// `0` means no auto-dismiss.
    pub duration_ms: u64,
    #[serde(skip)]
    pub created_at: Instant,
}

impl Notification {
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.duration_ms == 0
    }

    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Time left before auto-dismiss, or `None` for persistent notifications.
    ///
    /// Saturates at zero once the deadline has passed but the expiry task has
    /// not yet run.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        if self.is_persistent() {
            return None;
        }
        Some(Duration::from_millis(self.duration_ms).saturating_sub(self.age()))
    }
}

#[cfg(test)]
#[path = "notification_test.rs"]
mod tests;
