//! Transient notifications for mint outcomes.
//!
//! Pending entries stay until explicitly dismissed; success and failure
//! entries expire on their own after a fixed display duration. The page
//! polls `GET /notifications` for the active set.

use serde::Serialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotifyKind,
    pub message: String,
    #[serde(skip)]
    created: Instant,
    #[serde(skip)]
    ttl: Option<Duration>,
}

impl Notification {
    fn expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.created.elapsed() >= ttl,
            None => false,
        }
    }
}

struct Inner {
    next_id: u64,
    items: Vec<Notification>,
}

/// In-memory notification surface.
pub struct Notifier {
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(Inner {
                next_id: 1,
                items: Vec::new(),
            }),
        }
    }

    /// Indeterminate notification; lives until dismissed.
    pub fn pending(&self, message: impl Into<String>) -> u64 {
        self.push(NotifyKind::Pending, message.into(), None)
    }

    /// Auto-dismissing success notification.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotifyKind::Success, message.into(), Some(self.ttl))
    }

    /// Auto-dismissing failure notification.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotifyKind::Error, message.into(), Some(self.ttl))
    }

    fn push(&self, kind: NotifyKind, message: String, ttl: Option<Duration>) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = inner.next_id;
        inner.next_id += 1;
        inner.items.push(Notification {
            id,
            kind,
            message,
            created: Instant::now(),
            ttl,
        });
        id
    }

    pub fn dismiss(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.items.retain(|item| item.id != id);
    }

    /// Currently visible notifications; expired ones are purged first.
    pub fn active(&self) -> Vec<Notification> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.items.retain(|item| !item.expired());
        inner.items.clone()
    }
}
