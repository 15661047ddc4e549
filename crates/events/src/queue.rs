//! Deferred notification queue.
//!
//! [`NotificationQueue`] collects `(key, args)` pairs during one processing
//! cycle. Scheduling never validates and never fails; everything is checked
//! when the queue is drained at the end of the cycle.
//!
//! A queue belongs to exactly one cycle. Hosts that run cycles concurrently
//! give each cycle its own queue (see the API crate's request middleware),
//! so one cycle's flush can never deliver another cycle's notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tidings_core::types::Timestamp;

/// A notification request recorded by [`NotificationQueue::schedule`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    /// Registry key. Unknown keys are skipped at flush time.
    pub key: String,
    /// Raw arguments. Non-object values become an empty mapping at flush time.
    pub args: serde_json::Value,
    /// When the notification was scheduled (UTC).
    pub scheduled_at: Timestamp,
}

/// Insertion-ordered queue of scheduled notifications.
///
/// Cheap to clone; clones share the same underlying queue so a handle can be
/// handed to business code while the host keeps another for flushing.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: Arc<Mutex<Vec<ScheduledNotification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification to be dispatched at the end of the cycle.
    ///
    /// The same key may be scheduled any number of times; each call becomes
    /// its own dispatch attempt.
    pub fn schedule(&self, key: impl Into<String>, args: serde_json::Value) {
        let entry = ScheduledNotification {
            key: key.into(),
            args,
            scheduled_at: Utc::now(),
        };
        tracing::trace!(key = %entry.key, "Notification scheduled");
        self.lock().push(entry);
    }

    /// Take every scheduled notification, in insertion order, leaving the
    /// queue empty.
    ///
    /// Anything scheduled after this call lands in the (now empty) queue and
    /// is delivered by the next drain, not the current one.
    pub fn drain(&self) -> Vec<ScheduledNotification> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Poisoning is ignored: no critical section leaves the `Vec` half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<ScheduledNotification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
