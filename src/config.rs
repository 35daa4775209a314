// Purpose: Centralized runtime configuration for the event ledger

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger_store::DEFAULT_CAPACITY;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Storage backend, "sled" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Retained entry cap; older entries fall off once exceeded
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|base| base.join("rigledger"))
        .unwrap_or_else(|| PathBuf::from("./rigledger-data"))
        .to_string_lossy()
        .into_owned()
}

fn default_backend() -> String {
    "sled".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            data_dir: default_data_dir(),
            backend: default_backend(),
            capacity: default_capacity(),
            page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.capacity == 0 {
            return Err(LedgerError::config("capacity must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(LedgerError::config("page_size must be at least 1"));
        }
        match self.backend.as_str() {
            "sled" | "memory" => {}
            other => {
                return Err(LedgerError::config(format!(
                    "unknown backend '{other}', expected 'sled' or 'memory'"
                )))
            }
        }
        tracing::Level::from_str(&self.log_level).map_err(|_| {
            LedgerError::config(format!("unknown log_level '{}'", self.log_level))
        })?;
        Ok(())
    }

    /// Where the sled database lives under `data_dir`
    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("ledger.sled")
    }
}
