//! User-facing notifications.
//!
//! Effects hand notifications to an injected [`Notifier`] and move on; how
//! (and whether) they are shown is up to the implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for notifications. Must never block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(id = %notification.id, "{}", notification.message)
            }
            NotificationLevel::Error => {
                tracing::error!(id = %notification.id, "{}", notification.message)
            }
        }
    }
}

/// Forwards notifications to an unbounded channel.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::trace!("Notification dropped (receiver gone)");
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    expires_at: Instant,
}

/// Toast stack that dismisses each entry after a fixed duration.
pub struct ToastQueue {
    duration: Duration,
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            toasts: Mutex::new(Vec::new()),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Toasts still visible now, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Toasts still visible at `now`; expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut toasts = self.toasts.lock();
        toasts.retain(|toast| toast.expires_at > now);
        toasts
            .iter()
            .map(|toast| toast.notification.clone())
            .collect()
    }

    /// Close a toast before it expires. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock();
        let before = toasts.len();
        toasts.retain(|toast| toast.notification.id != id);
        toasts.len() != before
    }

    fn push_at(&self, notification: Notification, now: Instant) {
        let mut toasts = self.toasts.lock();
        toasts.retain(|toast| toast.expires_at > now);
        toasts.push(Toast {
            notification,
            expires_at: now + self.duration,
        });
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }
}

/// Sends every notification to each inner notifier.
pub struct FanoutNotifier {
    targets: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<Arc<dyn Notifier>>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: Notification) {
        for target in &self.targets {
            target.notify(notification.clone());
        }
    }
}
