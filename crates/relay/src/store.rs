//! Bounded in-memory notification history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

/// Default bound on retained notifications.
pub const DEFAULT_CAPACITY: usize = 50;

/// A single received webhook, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// When the webhook was received.
    pub received_at: DateTime<Utc>,
    /// The payload, verbatim.
    pub payload: Value,
}

/// Insertion-ordered notification history bounded at a fixed capacity.
///
/// All access goes through the internal mutex: append, snapshot and clear
/// are atomic relative to each other, so concurrent webhook deliveries
/// never observe the store mid-eviction or a count that disagrees with
/// the returned records. State lives for the process lifetime only.
#[derive(Debug)]
pub struct NotificationStore {
    capacity: usize,
    inner: Mutex<VecDeque<Notification>>,
}

impl NotificationStore {
    /// Create a store bounded at `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a payload, evicting the oldest records once the bound is
    /// exceeded.
    pub async fn append(&self, payload: Value) {
        let mut inner = self.inner.lock().await;
        inner.push_back(Notification {
            received_at: Utc::now(),
            payload,
        });
        while inner.len() > self.capacity {
            inner.pop_front();
        }
    }

    /// Copy of the current contents in insertion order, plus the count.
    ///
    /// The returned records are isolated from later appends.
    pub async fn snapshot(&self) -> (Vec<Notification>, usize) {
        let inner = self.inner.lock().await;
        let records: Vec<Notification> = inner.iter().cloned().collect();
        let count = records.len();
        (records, count)
    }

    /// Drop all records, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let removed = inner.len();
        inner.clear();
        removed
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
