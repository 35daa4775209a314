//! Watcher registry
//!
//! The console views that used to hang off a page-wide broadcast now hold an
//! explicit subscription on the ledger itself. The registry is owned by the
//! store; appends push each new entry to every registered callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::errors::{LedgerResult, SafeReadLock, SafeWriteLock};
use crate::ledger::LogEntry;

/// Opaque handle identifying one subscription
pub type WatchId = u64;

type WatchCallback = Box<dyn Fn(&LogEntry) + Send + Sync>;

/// Subscription list for ledger append notifications
pub struct WatcherRegistry {
    watchers: RwLock<Vec<(WatchId, WatchCallback)>>,
    next_id: AtomicU64,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self {
            watchers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a callback invoked with every appended entry
    pub fn subscribe<F>(&self, callback: F) -> LedgerResult<WatchId>
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut watchers = self.watchers.safe_write()?;
        watchers.push((id, Box::new(callback)));
        Ok(id)
    }

    /// Remove a subscription; returns false when the id is unknown
    pub fn unsubscribe(&self, id: WatchId) -> LedgerResult<bool> {
        let mut watchers = self.watchers.safe_write()?;
        let before = watchers.len();
        watchers.retain(|(watch_id, _)| *watch_id != id);
        Ok(watchers.len() != before)
    }

    /// Number of live subscriptions
    pub fn watcher_count(&self) -> usize {
        self.watchers.safe_read().map(|w| w.len()).unwrap_or(0)
    }

    /// Deliver an appended entry to every subscriber
    ///
    /// Delivery is best-effort: the append that triggered it has already been
    /// persisted, so a poisoned registry only costs the notification.
    pub fn notify(&self, entry: &LogEntry) {
        match self.watchers.safe_read() {
            Ok(watchers) => {
                for (_, callback) in watchers.iter() {
                    callback(entry);
                }
            }
            Err(_) => {
                tracing::warn!(entry_id = %entry.id, "watcher registry poisoned, skipping notify");
            }
        }
    }
}

impl Default for WatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
