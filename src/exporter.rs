// Purpose: Export ledger data (CSV tables, per-entry JSON, zip snapshots)
// with checksummed manifests and version-safe structure

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::LogEntry;

pub const CSV_HEADER: &str = "id,timestamp_ms,timestamp_iso,category,action,metadata";

const ARCHIVE_VERSION: u32 = 1;

#[derive(Debug)]
pub struct SnapshotResult {
    pub archive_path: PathBuf,
    pub entry_count: usize,
}

/// Render a snapshot as CSV, one row per entry, newest first if the caller
/// passes them that way. Fields holding commas, quotes, or line breaks are
/// quoted with embedded quotes doubled.
pub fn entries_to_csv(entries: &[LogEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let iso = entry
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let row = [
            csv_field(&entry.id),
            entry.timestamp_ms().to_string(),
            csv_field(&iso),
            csv_field(entry.category.label()),
            csv_field(&entry.action),
            csv_field(&entry.metadata_json()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn export_csv(entries: &[LogEntry], output: &Path) -> LedgerResult<()> {
    fs::write(output, entries_to_csv(entries))
        .map_err(|e| LedgerError::io(format!("writing CSV to {}", output.display()), e))
}

/// Pretty-printed JSON for a single entry, matching what the console's
/// per-event download produced
pub fn entry_to_json(entry: &LogEntry) -> LedgerResult<String> {
    serde_json::to_string_pretty(entry)
        .map_err(|e| LedgerError::serialization("rendering entry as JSON", e))
}

pub fn export_entry(entry: &LogEntry, output: &Path) -> LedgerResult<()> {
    let json = entry_to_json(entry)?;
    fs::write(output, json)
        .map_err(|e| LedgerError::io(format!("writing entry to {}", output.display()), e))
}

/// Write a timestamped zip snapshot next to `output_prefix` containing the
/// full entry sequence as JSON and CSV plus a manifest with SHA-256 digests
/// of both payloads.
pub fn export_snapshot(entries: &[LogEntry], output_prefix: &str) -> LedgerResult<SnapshotResult> {
    let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let archive_path = PathBuf::from(format!("{output_prefix}_{timestamp}.zip"));

    let json_payload = serde_json::to_string_pretty(entries)
        .map_err(|e| LedgerError::serialization("rendering snapshot JSON", e))?;
    let csv_payload = entries_to_csv(entries);

    let manifest = serde_json::json!({
        "archive_version": ARCHIVE_VERSION,
        "exported_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "entry_count": entries.len(),
        "files": {
            "entries.json": format!("{:x}", Sha256::digest(json_payload.as_bytes())),
            "entries.csv": format!("{:x}", Sha256::digest(csv_payload.as_bytes())),
        },
    });
    let manifest_payload = serde_json::to_string_pretty(&manifest)
        .map_err(|e| LedgerError::serialization("rendering snapshot manifest", e))?;

    let file = File::create(&archive_path)
        .map_err(|e| LedgerError::io(format!("creating {}", archive_path.display()), e))?;

    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let members = [
        ("entries.json", json_payload.as_str()),
        ("entries.csv", csv_payload.as_str()),
        ("manifest.json", manifest_payload.as_str()),
    ];

    for (name, payload) in members {
        zip.start_file(name, options)
            .map_err(|e| LedgerError::archive(format!("adding {name}"), e))?;
        zip.write_all(payload.as_bytes())
            .map_err(|e| LedgerError::io(format!("writing {name} into archive"), e))?;
    }

    zip.finish()
        .map_err(|e| LedgerError::archive("finalizing archive", e))?;

    tracing::info!(
        path = %archive_path.display(),
        entries = entries.len(),
        "snapshot exported"
    );

    Ok(SnapshotResult {
        archive_path,
        entry_count: entries.len(),
    })
}
