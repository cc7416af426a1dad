//! Transient notification system (toasts).
//!
//! DESIGN
//! ======
//! - [`notification`] defines the `Notification` record, its id and severity.
//! - [`manager`] owns the ordered list and one expiry task per notification.
//!
//! The rendering layer reads [`NotificationManager::list`] (or follows
//! [`NotificationManager::subscribe`]) and calls
//! [`NotificationManager::dismiss`] when the user closes a toast. Display
//! order is creation order, oldest first; a renderer that wants newest-first
//! reverses the snapshot.

mod manager;
mod notification;

pub use manager::{NotificationManager, NotifyError};
pub use notification::{Notification, NotificationId, NotificationInput, Severity};
