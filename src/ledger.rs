// Core event model for the rig console ledger.
// Every subsystem of the console records its discrete actions as LogEntry
// values; the store in ledger_store.rs owns ordering and retention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LedgerError;

/// Fixed classification for ledger entries, matching the console's sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    System,
    Financial,
    Security,
    Operation,
    Ai,
    Marketplace,
}

impl EventCategory {
    /// All categories, in display order
    pub const ALL: [EventCategory; 6] = [
        EventCategory::System,
        EventCategory::Financial,
        EventCategory::Security,
        EventCategory::Operation,
        EventCategory::Ai,
        EventCategory::Marketplace,
    ];

    /// Stable label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::System => "SYSTEM",
            EventCategory::Financial => "FINANCIAL",
            EventCategory::Security => "SECURITY",
            EventCategory::Operation => "OPERATION",
            EventCategory::Ai => "AI",
            EventCategory::Marketplace => "MARKETPLACE",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(EventCategory::System),
            "FINANCIAL" => Ok(EventCategory::Financial),
            "SECURITY" => Ok(EventCategory::Security),
            "OPERATION" => Ok(EventCategory::Operation),
            "AI" => Ok(EventCategory::Ai),
            "MARKETPLACE" => Ok(EventCategory::Marketplace),
            other => Err(LedgerError::validation(
                "category",
                format!("unknown category '{other}'"),
            )),
        }
    }
}

/// A single immutable ledger record
///
/// Entries are constructed once at append time and never mutated afterwards;
/// the store evicts the oldest ones past its capacity. The timestamp is
/// serialized as milliseconds since epoch, which is also the on-disk form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl LogEntry {
    /// Generates a new entry with a fresh id and the current time
    pub fn new(category: EventCategory, action: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            // millisecond precision, identical to the serialized form
            timestamp: DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now),
            category,
            action: action.to_string(),
            metadata: None,
        }
    }

    /// Attaches an arbitrary key-value mapping to the entry
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Creation time as milliseconds since epoch
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Metadata rendered as a compact JSON string, empty when absent
    pub fn metadata_json(&self) -> String {
        self.metadata
            .as_ref()
            .map(|m| serde_json::to_string(m).unwrap_or_default())
            .unwrap_or_default()
    }
}
