//! Capped append-only event store
//!
//! The ledger keeps the most recent entries (newest first) in memory, mirrors
//! the full sequence into a single key of an injected key-value backend on
//! every append, and notifies registered watchers once a write is durable.

use std::sync::RwLock;

use serde_json::Map;

use crate::errors::{LedgerError, LedgerResult, SafeReadLock, SafeWriteLock};
use crate::ledger::{EventCategory, LogEntry};
use crate::ledger_watch::{WatchId, WatcherRegistry};

/// Default retention cap, matching the console's history window
pub const DEFAULT_CAPACITY: usize = 500;

/// Single storage key holding the JSON-encoded entry sequence
pub const STORAGE_KEY: &str = "console_events";

/// Action text of the record appended right before a purge
pub const PURGE_ACTION: &str = "event ledger purged";

/// Key-value persistence contract the ledger writes through
///
/// The store never interprets backend failures; they surface to the caller
/// as [`LedgerError::Backend`]. Implementations must make `put` durable
/// before returning.
pub trait LedgerBackend: Send + Sync {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()>;

    fn remove(&self, key: &str) -> LedgerResult<()>;

    /// Short label used in diagnostics
    fn name(&self) -> &'static str;
}

/// Bounded, durable, observable record of console events
pub struct EventLedger {
    entries: RwLock<Vec<LogEntry>>,
    backend: Box<dyn LedgerBackend>,
    watchers: WatcherRegistry,
    capacity: usize,
}

impl EventLedger {
    /// Open a ledger over the given backend, loading any persisted sequence.
    ///
    /// Missing data starts the ledger empty. Unreadable or malformed data
    /// also starts it empty, with a warning on the diagnostic channel; the
    /// console treats a broken history as a cleared one rather than refusing
    /// to start.
    pub fn open(backend: Box<dyn LedgerBackend>, capacity: usize) -> LedgerResult<Self> {
        if capacity == 0 {
            return Err(LedgerError::config("ledger capacity must be nonzero"));
        }

        let mut entries = match backend.get(STORAGE_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<LogEntry>>(&bytes) {
                Ok(list) => list,
                Err(err) => {
                    tracing::warn!(
                        backend = backend.name(),
                        error = %err,
                        "persisted ledger payload is malformed, starting empty"
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(
                    backend = backend.name(),
                    error = %err,
                    "failed to read persisted ledger, starting empty"
                );
                Vec::new()
            }
        };

        if entries.len() > capacity {
            tracing::warn!(
                stored = entries.len(),
                capacity,
                "persisted ledger exceeds capacity, trimming oldest entries"
            );
            entries.truncate(capacity);
        }

        Ok(Self {
            entries: RwLock::new(entries),
            backend,
            watchers: WatcherRegistry::new(),
            capacity,
        })
    }

    /// Record a new event.
    ///
    /// The entry is prepended to the sequence, the sequence is trimmed to
    /// capacity and persisted, and only then does the in-memory view update
    /// and watchers fire. On a persistence failure nothing is retained: the
    /// caller gets the error and the ledger still matches storage.
    pub fn append(
        &self,
        category: EventCategory,
        action: &str,
        metadata: Option<Map<String, serde_json::Value>>,
    ) -> LedgerResult<LogEntry> {
        let mut entry = LogEntry::new(category, action);
        if let Some(metadata) = metadata {
            entry = entry.with_metadata(metadata);
        }

        {
            let mut entries = self.entries.safe_write()?;

            let mut next = Vec::with_capacity(entries.len() + 1);
            next.push(entry.clone());
            next.extend(entries.iter().cloned());
            next.truncate(self.capacity);

            let payload = serde_json::to_vec(&next)
                .map_err(|e| LedgerError::serialization("encoding ledger entries", e))?;

            if let Err(err) = self.backend.put(STORAGE_KEY, &payload) {
                tracing::error!(
                    backend = self.backend.name(),
                    entry_id = %entry.id,
                    error = %err,
                    "ledger append was not persisted"
                );
                return Err(err);
            }

            *entries = next;
        }

        self.watchers.notify(&entry);
        Ok(entry)
    }

    /// Snapshot of the current sequence, most recent first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .safe_read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.safe_read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retention cap this ledger was opened with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Name of the storage backend behind this ledger
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Discard all entries.
    ///
    /// A final purge record goes through the normal append path first, so it
    /// is durable and watchers observe it; afterwards the storage key is
    /// removed and the in-memory sequence emptied.
    pub fn clear(&self) -> LedgerResult<()> {
        self.append(EventCategory::System, PURGE_ACTION, None)?;

        let mut entries = self.entries.safe_write()?;
        self.backend.remove(STORAGE_KEY)?;
        entries.clear();
        Ok(())
    }

    /// Register a callback invoked with every entry this ledger appends
    pub fn subscribe<F>(&self, callback: F) -> LedgerResult<WatchId>
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        self.watchers.subscribe(callback)
    }

    /// Remove a previously registered callback
    pub fn unsubscribe(&self, id: WatchId) -> LedgerResult<bool> {
        self.watchers.unsubscribe(id)
    }
}
