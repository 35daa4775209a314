// In-memory implementation of the ledger's key-value contract.
// Selectable as an ephemeral backend and used by tests in place of sled,
// including a switchable write-failure mode for exercising the append error
// path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{LedgerError, LedgerResult, SafeLock};
use crate::ledger_store::LedgerBackend;

/// Volatile backend over a locked map
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A backend whose writes fail from the start
    pub fn failing() -> Self {
        let backend = Self::new();
        backend.fail_writes.store(true, Ordering::SeqCst);
        backend
    }

    /// Shared switch for toggling write failures after the backend is boxed
    pub fn fail_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_writes)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerBackend for MemoryBackend {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let entries = self.entries.safe_lock()?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::backend(
                "writing ledger key",
                std::io::Error::new(std::io::ErrorKind::Other, "write rejected (simulated)"),
            ));
        }
        let mut entries = self.entries.safe_lock()?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let mut entries = self.entries.safe_lock()?;
        entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_and_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("k").unwrap(), None);

        backend.put("k", b"payload").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some(&b"payload"[..]));

        backend.remove("k").unwrap();
        assert_eq!(backend.get("k").unwrap(), None);
    }

    #[test]
    fn failing_mode_rejects_writes_only() {
        let backend = MemoryBackend::new();
        backend.put("k", b"v").unwrap();

        let flag = backend.fail_flag();
        flag.store(true, Ordering::SeqCst);

        assert!(backend.put("k", b"other").is_err());
        // reads keep working and see the old value
        assert_eq!(backend.get("k").unwrap().as_deref(), Some(&b"v"[..]));

        flag.store(false, Ordering::SeqCst);
        backend.put("k", b"other").unwrap();
    }
}
