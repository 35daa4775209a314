//! Ledger persistence round-trip through the sled backend

use rigledger::ledger::EventCategory;
use rigledger::ledger_store::{EventLedger, DEFAULT_CAPACITY};
use rigledger::ledger_store_sled::SledBackend;
use tempfile::TempDir;

fn open_ledger(path: &std::path::Path, capacity: usize) -> EventLedger {
    let backend = SledBackend::open(path).expect("sled backend");
    EventLedger::open(Box::new(backend), capacity).expect("open ledger")
}

#[test]
fn entries_survive_reopen() {
    let tmp = TempDir::new().expect("tmp dir");
    let db_path = tmp.path().join("ledger.sled");

    // Record a few events, one carrying metadata
    let ledger = open_ledger(&db_path, DEFAULT_CAPACITY);
    ledger
        .append(EventCategory::System, "node online", None)
        .expect("append");

    let mut meta = serde_json::Map::new();
    meta.insert("rig".to_string(), serde_json::json!("RIG-7742"));
    ledger
        .append(EventCategory::Financial, "payout scheduled", Some(meta))
        .expect("append");
    ledger
        .append(EventCategory::Security, "operator login verified", None)
        .expect("append");

    let before = ledger.entries();
    drop(ledger);

    // Reopen from the same path and compare the retained sequence
    let reopened = open_ledger(&db_path, DEFAULT_CAPACITY);
    let after = reopened.entries();

    assert_eq!(after, before, "sequence must survive a restart intact");
    assert_eq!(after[0].action, "operator login verified");
    assert_eq!(
        after[1].metadata.as_ref().expect("metadata retained")["rig"],
        serde_json::json!("RIG-7742")
    );
}

#[test]
fn capacity_holds_across_restart() {
    let tmp = TempDir::new().expect("tmp dir");
    let db_path = tmp.path().join("ledger.sled");

    let ledger = open_ledger(&db_path, 5);
    for i in 0..7 {
        ledger
            .append(EventCategory::System, &format!("evt-{i}"), None)
            .expect("append");
    }
    assert_eq!(ledger.len(), 5);
    drop(ledger);

    let reopened = open_ledger(&db_path, 5);
    let entries = reopened.entries();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].action, "evt-6");
    assert_eq!(entries[4].action, "evt-2");
}

#[test]
fn purge_is_durable() {
    let tmp = TempDir::new().expect("tmp dir");
    let db_path = tmp.path().join("ledger.sled");

    let ledger = open_ledger(&db_path, DEFAULT_CAPACITY);
    ledger
        .append(EventCategory::System, "node online", None)
        .expect("append");
    ledger
        .append(EventCategory::Operation, "hashrate throttled", None)
        .expect("append");
    ledger.clear().expect("clear");
    assert!(ledger.is_empty());
    drop(ledger);

    let reopened = open_ledger(&db_path, DEFAULT_CAPACITY);
    assert!(reopened.is_empty(), "purge must survive a restart");
}
