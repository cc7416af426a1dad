//! Notification lifecycle management.
//!
//! DESIGN
//! ======
//! `NotificationManager` is a cheap `Clone` handle over shared state, the
//! same way a service handle is passed to every consumer. The state holds
//! the visible list plus a side table `NotificationId -> AbortHandle`; an
//! entry exists in that table exactly while an expiry task is pending.
//!
//! Expiry tasks hold a `Weak` reference. Once every handle is dropped the
//! state's `Drop` aborts the remaining tasks, and any task that wins the race
//! finds nothing to upgrade.
//!
//! RACES
//! =====
//! Manual dismissal and timer expiry both go through the side table under
//! the same lock. Whichever removes the table entry first performs the
//! removal; the other sees no entry and does nothing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use super::notification::{Notification, NotificationId, NotificationInput};
use crate::config::{DEFAULT_NOTIFY_DURATION_MS, PortalConfig};
use crate::error::ErrorCode;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification message must not be empty")]
    EmptyMessage,
    #[error("notification duration must be >= 0 ms, got {duration_ms}")]
    NegativeDuration { duration_ms: i64 },
    #[error("auto-dismissing notifications require a tokio runtime")]
    NoRuntime,
    #[error("notification manager has been shut down")]
    ShutDown,
}

impl ErrorCode for NotifyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "E_NOTIFY_EMPTY_MESSAGE",
            Self::NegativeDuration { .. } => "E_NOTIFY_NEGATIVE_DURATION",
            Self::NoRuntime => "E_NOTIFY_NO_RUNTIME",
            Self::ShutDown => "E_NOTIFY_SHUT_DOWN",
        }
    }
}

// =============================================================================
// MANAGER
// =============================================================================

/// Shared handle to the process-wide notification list.
#[derive(Clone)]
pub struct NotificationManager {
    inner: Arc<Mutex<Inner>>,
    default_duration_ms: u64,
}

struct Inner {
    /// Visible notifications, oldest first.
    entries: Vec<Notification>,
    /// Pending expiry tasks keyed by notification.
    timers: HashMap<NotificationId, AbortHandle>,
    /// Last id handed out. Ids start at 1.
    last_id: u64,
    closed: bool,
    changes: watch::Sender<Vec<Notification>>,
}

impl Inner {
    fn remove_entry(&mut self, id: NotificationId) -> bool {
        let Some(pos) = self.entries.iter().position(|n| n.id == id) else {
            return false;
        };
        self.entries.remove(pos);
        self.publish();
        true
    }

    fn cancel_timers(&mut self) -> usize {
        let count = self.timers.len();
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        count
    }

    fn publish(&self) {
        self.changes.send_replace(self.entries.clone());
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_DURATION_MS)
    }
}

impl std::fmt::Debug for NotificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("NotificationManager")
            .field("visible", &inner.entries.len())
            .field("pending_timers", &inner.timers.len())
            .field("default_duration_ms", &self.default_duration_ms)
            .finish_non_exhaustive()
    }
}

impl NotificationManager {
    /// Create an empty manager. `default_duration_ms` applies when `show`
    /// is called without an explicit duration; `0` makes the default persistent.
    #[must_use]
    pub fn new(default_duration_ms: u64) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: Vec::new(),
                timers: HashMap::new(),
                last_id: 0,
                closed: false,
                changes,
            })),
            default_duration_ms,
        }
    }

    #[must_use]
    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(config.default_duration_ms)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a notification and, for a positive duration, schedule its expiry.
    ///
    /// Returns the id so the caller can dismiss it early. Validation happens
    /// before any mutation: on error the list is untouched.
    pub fn show(&self, input: NotificationInput) -> Result<NotificationId, NotifyError> {
        if input.message.trim().is_empty() {
            return Err(NotifyError::EmptyMessage);
        }
        let duration_ms = match input.duration_ms {
            None => self.default_duration_ms,
            Some(ms) => u64::try_from(ms).map_err(|_| NotifyError::NegativeDuration { duration_ms: ms })?,
        };
        let runtime = if duration_ms > 0 {
            Some(Handle::try_current().map_err(|_| NotifyError::NoRuntime)?)
        } else {
            None
        };

        let mut inner = self.lock();
        if inner.closed {
            return Err(NotifyError::ShutDown);
        }

        inner.last_id += 1;
        let id = NotificationId::from_raw(inner.last_id);
        inner.entries.push(Notification {
            id,
            title: input.title,
            message: input.message,
            severity: input.severity,
            duration_ms,
            created_at: Instant::now(),
        });

        // The task cannot observe the table before this insert: it needs the lock we hold.
        if let Some(runtime) = runtime {
            let state = Arc::downgrade(&self.inner);
            let task = runtime.spawn(async move {
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                expire(&state, id);
            });
            inner.timers.insert(id, task.abort_handle());
        }

        inner.publish();
        debug!(%id, severity = ?input.severity, duration_ms, "notification shown");
        Ok(id)
    }

    /// Remove a notification and cancel its pending expiry.
    ///
    /// Unknown or already-removed ids are a no-op. Returns whether anything
    /// was removed.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut inner = self.lock();
        if let Some(handle) = inner.timers.remove(&id) {
            handle.abort();
        }
        let removed = inner.remove_entry(id);
        if removed {
            debug!(%id, "notification dismissed");
        } else {
            trace!(%id, "dismiss ignored; notification not present");
        }
        removed
    }

    /// Dismiss every visible notification. Returns how many were removed.
    pub fn dismiss_all(&self) -> usize {
        let mut inner = self.lock();
        inner.cancel_timers();
        let count = inner.entries.len();
        if count > 0 {
            inner.entries.clear();
            inner.publish();
            debug!(count, "all notifications dismissed");
        }
        count
    }

    /// Snapshot of visible notifications in creation order, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Notification> {
        self.lock().entries.clone()
    }

    /// Look up a single visible notification.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.lock().entries.iter().find(|n| n.id == id).cloned()
    }

    /// Receiver that yields a fresh snapshot after every list change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.lock().changes.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Number of expiry tasks that have not fired or been cancelled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Cancel every pending expiry and refuse further `show` calls.
    ///
    /// Visible notifications stay in the list; nothing will remove them
    /// automatically any more.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        let cancelled = inner.cancel_timers();
        info!(cancelled, visible = inner.entries.len(), "notification manager shut down");
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.lock().closed
    }
}

/// Body of an expiry task once its delay has elapsed.
fn expire(state: &Weak<Mutex<Inner>>, id: NotificationId) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut inner = state.lock().unwrap_or_else(PoisonError::into_inner);

    // EDGE: dismissed while this task was waiting for the lock.
    if inner.timers.remove(&id).is_none() {
        return;
    }
    if inner.remove_entry(id) {
        debug!(%id, "notification expired");
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
