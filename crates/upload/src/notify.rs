//! Transient user-facing notifications.
//!
//! At most one notification is visible: a new one replaces the previous
//! one, and each disappears on its own once its duration has elapsed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

/// Default display duration.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(4);

/// The visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A notification about one terminal upload outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.duration
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// Single-slot notification holder, shared by clones.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierInner>>,
}

#[derive(Debug)]
struct NotifierInner {
    current: Option<Notification>,
    next_id: u64,
    duration: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Creates a notifier with the default 4 s duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierInner {
                current: None,
                next_id: 0,
                duration,
            })),
        }
    }

    /// Shows a notification, replacing any visible one. Returns its ID.
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let duration = inner.duration;
        inner.current = Some(Notification {
            id,
            kind,
            message: message.into(),
            shown_at: Instant::now(),
            duration,
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, message)
    }

    /// The visible notification, if any and not yet expired.
    pub fn current(&self) -> Option<Notification> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .current
            .as_ref()
            .is_some_and(|n| n.is_expired_at(Instant::now()))
        {
            inner.current = None;
        }
        inner.current.clone()
    }

    /// Dismisses the notification with `id`. Returns `true` if it was visible.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.current.as_ref().is_some_and(|n| n.id == id) {
            inner.current = None;
            true
        } else {
            false
        }
    }
}
