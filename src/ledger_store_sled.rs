// Sled-backed implementation of the ledger's key-value contract.
// One database, one tree; every put flushes so an append is on disk before
// the store updates its in-memory view.

use std::path::Path;

use sled::Db;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger_store::LedgerBackend;

const TREE_NAME: &str = "ledger";

/// Durable backend over a sled database directory
pub struct SledBackend {
    db: Db,
}

impl SledBackend {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let db = sled::open(path)
            .map_err(|e| LedgerError::backend(format!("opening sled db at {}", path.display()), e))?;
        Ok(Self { db })
    }

    fn tree(&self) -> LedgerResult<sled::Tree> {
        self.db
            .open_tree(TREE_NAME)
            .map_err(|e| LedgerError::backend("opening ledger tree", e))
    }
}

impl LedgerBackend for SledBackend {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let tree = self.tree()?;
        let value = tree
            .get(key.as_bytes())
            .map_err(|e| LedgerError::backend("reading ledger key", e))?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        let tree = self.tree()?;
        tree.insert(key.as_bytes(), value)
            .map_err(|e| LedgerError::backend("writing ledger key", e))?;
        tree.flush()
            .map_err(|e| LedgerError::backend("flushing ledger tree", e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let tree = self.tree()?;
        tree.remove(key.as_bytes())
            .map_err(|e| LedgerError::backend("removing ledger key", e))?;
        tree.flush()
            .map_err(|e| LedgerError::backend("flushing ledger tree", e))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sled"
    }
}
