//! Result notifications
//!
//! Transient, dismissible messages describing how a submission ended. The
//! notifier is injected into each controller; emission never blocks and
//! never fails from the caller's point of view.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use ulid::Ulid;

/// Notification identifier (ULID, sortable by emission time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Ulid);

impl NotificationId {
    /// Generate a new id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Submission accepted
    Success,
    /// Submission failed
    Failure,
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier used for dismissal
    pub id: NotificationId,
    /// Outcome kind
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub description: String,
    /// Emission time
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped now
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            description: description.into(),
            emitted_at: Utc::now(),
        }
    }

    /// Whether the notification outlived `ttl` at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        chrono::Duration::from_std(ttl).map_or(false, |ttl| now - self.emitted_at >= ttl)
    }
}

/// Capability to surface a submission outcome
///
/// Controllers call it with no internal lock held, so an implementation may
/// read back the form that emitted the notification.
pub trait ResultNotifier: Send + Sync + std::fmt::Debug {
    /// Hand over a built notification; must not block
    fn deliver(&self, notification: Notification);

    /// Build and deliver a notification, returning its id
    fn notify(
        &self,
        kind: NotificationKind,
        title: &str,
        description: &str,
    ) -> NotificationId {
        let notification = Notification::new(kind, title, description);
        let id = notification.id;
        self.deliver(notification);
        id
    }
}

/// In-process FIFO of visible notifications
///
/// Bounded: when full, the oldest entry is dropped to make room. Entries
/// older than the time-to-live are dismissed on the next access.
#[derive(Debug)]
pub struct ToastQueue {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<VecDeque<Notification>>,
}

impl ToastQueue {
    /// Create a queue holding at most `capacity` notifications for `ttl` each
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Lock the queue with expired entries already dismissed
    fn live(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        let mut queue = self.inner.lock();
        let now = Utc::now();
        queue.retain(|n| !n.is_expired(now, self.ttl));
        queue
    }

    /// Visible notifications, oldest first
    #[must_use]
    pub fn pending(&self) -> Vec<Notification> {
        self.live().iter().cloned().collect()
    }

    /// Number of visible notifications
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live().len()
    }

    /// True when nothing is visible
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live().is_empty()
    }

    /// Dismiss one notification; returns whether it was visible
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut queue = self.live();
        match queue.iter().position(|n| n.id == id) {
            Some(idx) => {
                queue.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove notifications older than the queue's time-to-live at `now`
    ///
    /// Returns how many were removed.
    pub fn expire(&self, now: DateTime<Utc>) -> usize {
        let mut queue = self.inner.lock();
        let before = queue.len();
        queue.retain(|n| !n.is_expired(now, self.ttl));
        before - queue.len()
    }

    /// Take every visible notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        self.live().drain(..).collect()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(16, Duration::from_secs(5))
    }
}

impl ResultNotifier for ToastQueue {
    fn deliver(&self, notification: Notification) {
        let mut queue = self.live();
        if queue.len() >= self.capacity {
            if let Some(dropped) = queue.pop_front() {
                tracing::warn!(id = %dropped.id, "toast queue full, dropping oldest notification");
            }
        }
        tracing::debug!(id = %notification.id, kind = ?notification.kind, "notification queued");
        queue.push_back(notification);
    }
}

/// Forwards notifications to a consumer task over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create the notifier and the receiving end
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ResultNotifier for ChannelNotifier {
    fn deliver(&self, notification: Notification) {
        if let Err(e) = self.sender.send(notification) {
            tracing::warn!(id = %e.0.id, "notification consumer gone, dropping");
        }
    }
}
