//! Library root for the `rigledger` crate
//! Bounded, durable event ledger behind the rig management console

// Core error handling
pub mod errors;

// Event model
pub mod ledger;

// Ledger storage
pub mod ledger_store;
pub mod ledger_store_memory;
pub mod ledger_store_sled;

// Change notification
pub mod ledger_watch;

// View-side list operations
pub mod ledger_query;

// Exports & snapshots
pub mod exporter;

// Configuration & CLI
pub mod cli;
pub mod config;
pub mod config_loader;


// Re-export the types most callers touch
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{EventCategory, LogEntry};
pub use ledger_store::{EventLedger, LedgerBackend, DEFAULT_CAPACITY};
