//! Snapshot archive export and read-back verification

use std::fs::File;
use std::io::Read;

use rigledger::exporter::{self, CSV_HEADER};
use rigledger::ledger::{EventCategory, LogEntry};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use zip::ZipArchive;

fn sample_entries() -> Vec<LogEntry> {
    let mut meta = serde_json::Map::new();
    meta.insert("rig".to_string(), serde_json::json!("RIG-7742"));

    vec![
        LogEntry::new(EventCategory::Security, "operator login verified"),
        LogEntry::new(EventCategory::Financial, "payout scheduled").with_metadata(meta),
        LogEntry::new(EventCategory::System, "node online"),
    ]
}

fn read_member(archive: &mut ZipArchive<File>, name: &str) -> String {
    let mut member = archive.by_name(name).expect("archive member");
    let mut contents = String::new();
    member.read_to_string(&mut contents).expect("read member");
    contents
}

#[test]
fn snapshot_members_roundtrip_and_match_the_manifest() {
    let tmp = TempDir::new().expect("tmp dir");
    let prefix = tmp.path().join("rig_snapshot");
    let entries = sample_entries();

    let result = exporter::export_snapshot(&entries, prefix.to_str().expect("prefix"))
        .expect("export snapshot");
    assert_eq!(result.entry_count, entries.len());

    let file = File::open(&result.archive_path).expect("open archive");
    let mut archive = ZipArchive::new(file).expect("read archive");

    let json_payload = read_member(&mut archive, "entries.json");
    let csv_payload = read_member(&mut archive, "entries.csv");
    let manifest_payload = read_member(&mut archive, "manifest.json");

    // The JSON member restores the exact entry sequence
    let restored: Vec<LogEntry> = serde_json::from_str(&json_payload).expect("parse entries");
    assert_eq!(restored, entries);

    // The CSV member carries the console's header and one row per entry
    let mut lines = csv_payload.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.count(), entries.len());

    // Manifest digests match the payloads as stored
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_payload).expect("parse manifest");
    assert_eq!(manifest["entry_count"], serde_json::json!(entries.len()));
    assert_eq!(
        manifest["files"]["entries.json"],
        serde_json::json!(format!("{:x}", Sha256::digest(json_payload.as_bytes())))
    );
    assert_eq!(
        manifest["files"]["entries.csv"],
        serde_json::json!(format!("{:x}", Sha256::digest(csv_payload.as_bytes())))
    );
}

#[test]
fn archive_name_carries_prefix_and_timestamp() {
    let tmp = TempDir::new().expect("tmp dir");
    let prefix = tmp.path().join("console_archive");

    let result =
        exporter::export_snapshot(&[], prefix.to_str().expect("prefix")).expect("export snapshot");

    let name = result
        .archive_path
        .file_name()
        .expect("file name")
        .to_string_lossy();
    assert!(name.starts_with("console_archive_"));
    assert!(name.ends_with(".zip"));
    assert_eq!(result.entry_count, 0);
}
