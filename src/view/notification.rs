//! Single-slot toast notifications.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// Holds at most one notification. A new one replaces the old.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    slot: Option<Notification>,
    display_for: Duration,
}

impl NotificationCenter {
    pub fn new(display_for: Duration) -> Self {
        Self {
            slot: None,
            display_for,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let message = message.into();
        tracing::debug!(kind = kind.label(), message = %message, "notification");
        self.slot = Some(Notification {
            message,
            kind,
            shown_at: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info);
    }

    /// The notification still visible at `now`.
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.slot
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.shown_at) < self.display_for)
    }

    /// The last notification shown, expired or not.
    pub fn latest(&self) -> Option<&Notification> {
        self.slot.as_ref()
    }

    /// Drops the notification once its display time has passed.
    pub fn expire(&mut self, now: Instant) {
        if self.slot.is_some() && self.current(now).is_none() {
            self.slot = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
