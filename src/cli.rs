use std::path::Path;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, LedgerResult};
use crate::exporter;
use crate::ledger::{EventCategory, LogEntry};
use crate::ledger_query::{self, EventFilter, SortDir, SortField};
use crate::ledger_store::EventLedger;

/// Top-level CLI interface for the rig console ledger
#[derive(Parser)]
#[command(
    name = "rigledger",
    version = "0.1.0",
    about = "Event ledger CLI for the rig management console"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a console event
    Append {
        /// SYSTEM, FINANCIAL, SECURITY, OPERATION, AI, or MARKETPLACE
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        action: String,
        /// Extra key=value pairs stored as entry metadata
        #[arg(short, long)]
        meta: Vec<String>,
    },

    /// List events with the console's filter, sort, and paging controls
    List {
        #[arg(short, long)]
        category: Option<String>,
        /// Case-insensitive text match over action and metadata
        #[arg(short, long)]
        search: Option<String>,
        /// timestamp, category, or action
        #[arg(long, default_value = "timestamp")]
        sort: String,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Override the configured page size
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show ledger totals and the effective configuration
    Stats,

    /// Write the (optionally filtered) event list as CSV
    ExportCsv {
        #[arg(short, long)]
        output: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "timestamp")]
        sort: String,
        #[arg(long, default_value = "desc")]
        order: String,
    },

    /// Write a single event as pretty-printed JSON
    ExportEntry {
        #[arg(short, long)]
        id: String,
        /// Defaults to <id>.json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export a checksummed zip snapshot of the whole ledger
    Snapshot {
        /// Archive path prefix; a timestamp and .zip suffix are appended
        #[arg(short, long, default_value = "rigledger_snapshot")]
        output: String,
    },

    /// Erase the ledger, recording a final purge event first
    Purge {
        /// Confirm the purge
        #[arg(long)]
        yes: bool,
    },

    /// Populate the ledger with simulated console traffic
    Seed {
        #[arg(short, long, default_value_t = 25)]
        count: usize,
    },
}

pub fn dispatch(cli: Cli, ledger: &EventLedger, config: &LedgerConfig) -> LedgerResult<()> {
    match cli.command {
        None => show_overview(ledger, config),

        Some(Commands::Append {
            category,
            action,
            meta,
        }) => {
            let category: EventCategory = category.parse()?;
            let metadata = parse_meta_pairs(&meta)?;

            let printer = ledger.subscribe(|entry: &LogEntry| {
                println!("{}", format_entry_line(entry));
            })?;
            let appended = ledger.append(category, &action, metadata);
            ledger.unsubscribe(printer)?;

            let entry = appended?;
            println!("✅ Event {} recorded", entry.id);
            Ok(())
        }

        Some(Commands::List {
            category,
            search,
            sort,
            order,
            page,
            page_size,
        }) => {
            let entries = filtered_sorted(ledger, &category, &search, &sort, &order)?;
            let page_size = page_size.unwrap_or(config.page_size);
            let view = ledger_query::paginate(&entries, page, page_size);

            if view.total == 0 {
                println!("No events recorded.");
                return Ok(());
            }

            println!(
                "Page {} of {} ({} events)",
                view.page,
                view.page_count.max(1),
                view.total
            );
            for entry in &view.items {
                println!("{}", format_entry_line(entry));
            }
            if view.items.is_empty() {
                println!("(no events on this page)");
            }
            Ok(())
        }

        Some(Commands::Stats) => show_stats(ledger, config),

        Some(Commands::ExportCsv {
            output,
            category,
            search,
            sort,
            order,
        }) => {
            let entries = filtered_sorted(ledger, &category, &search, &sort, &order)?;
            exporter::export_csv(&entries, Path::new(&output))?;
            println!("✅ Wrote {} events to {output}", entries.len());
            Ok(())
        }

        Some(Commands::ExportEntry { id, output }) => {
            let entry = ledger
                .entries()
                .into_iter()
                .find(|entry| entry.id == id)
                .ok_or_else(|| LedgerError::not_found("ledger entry", &id))?;

            let output = output.unwrap_or_else(|| format!("{id}.json"));
            exporter::export_entry(&entry, Path::new(&output))?;
            println!("✅ Wrote event {id} to {output}");
            Ok(())
        }

        Some(Commands::Snapshot { output }) => {
            let entries = ledger.entries();
            let result = exporter::export_snapshot(&entries, &output)?;
            println!(
                "✅ Snapshot of {} events written to {}",
                result.entry_count,
                result.archive_path.display()
            );
            Ok(())
        }

        Some(Commands::Purge { yes }) => {
            if !yes {
                eprintln!("❌ Refusing to purge without --yes");
                eprintln!("   This erases all {} retained events.", ledger.len());
                return Ok(());
            }

            let printer = ledger.subscribe(|entry: &LogEntry| {
                println!("{}", format_entry_line(entry));
            })?;
            let purged = ledger.clear();
            ledger.unsubscribe(printer)?;
            purged?;

            println!("✅ Ledger purged");
            Ok(())
        }

        Some(Commands::Seed { count }) => {
            let printer = ledger.subscribe(|entry: &LogEntry| {
                println!("{}", format_entry_line(entry));
            })?;
            let seeded = seed_events(ledger, count);
            ledger.unsubscribe(printer)?;
            let seeded = seeded?;

            println!(
                "✅ Seeded {seeded} simulated events (ledger now holds {})",
                ledger.len()
            );
            Ok(())
        }
    }
}

/// Bare invocation mirrors the console's landing view: totals plus the
/// newest few events
fn show_overview(ledger: &EventLedger, config: &LedgerConfig) -> LedgerResult<()> {
    let entries = ledger.entries();
    println!(
        "{} events retained (capacity {}, backend {})",
        entries.len(),
        ledger.capacity(),
        ledger.backend_name()
    );

    if entries.is_empty() {
        println!("Run 'rigledger seed' to generate simulated console traffic.");
        return Ok(());
    }

    let shown = config.page_size.min(5);
    println!();
    for entry in entries.iter().take(shown) {
        println!("{}", format_entry_line(entry));
    }
    if entries.len() > shown {
        println!("... use 'rigledger list' to page through the rest");
    }
    Ok(())
}

fn show_stats(ledger: &EventLedger, config: &LedgerConfig) -> LedgerResult<()> {
    let entries = ledger.entries();
    println!(
        "Ledger: {} events (capacity {}, backend {})",
        entries.len(),
        ledger.capacity(),
        ledger.backend_name()
    );
    println!();
    for category in EventCategory::ALL {
        let count = entries.iter().filter(|e| e.category == category).count();
        println!("  {:<11} {count}", category.label());
    }

    if let (Some(newest), Some(oldest)) = (entries.first(), entries.last()) {
        println!();
        println!(
            "Covering {} to {}",
            oldest.timestamp.format("%Y-%m-%d %H:%M:%S"),
            newest.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }

    let rendered = toml::to_string_pretty(config)
        .map_err(|e| LedgerError::config(format!("rendering configuration: {e}")))?;
    println!();
    println!("# effective configuration");
    print!("{rendered}");
    Ok(())
}

fn filtered_sorted(
    ledger: &EventLedger,
    category: &Option<String>,
    search: &Option<String>,
    sort: &str,
    order: &str,
) -> LedgerResult<Vec<LogEntry>> {
    let category = match category {
        Some(raw) => Some(raw.parse::<EventCategory>()?),
        None => None,
    };
    let filter = EventFilter {
        category,
        search: search.clone(),
    };
    let sort: SortField = sort.parse()?;
    let order: SortDir = order.parse()?;

    let mut entries = ledger_query::filter_entries(&ledger.entries(), &filter);
    ledger_query::sort_entries(&mut entries, sort, order);
    Ok(entries)
}

fn parse_meta_pairs(pairs: &[String]) -> LedgerResult<Option<Map<String, Value>>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut metadata = Map::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            LedgerError::validation("meta", format!("expected key=value, got '{pair}'"))
        })?;
        if key.is_empty() {
            return Err(LedgerError::validation(
                "meta",
                format!("empty key in '{pair}'"),
            ));
        }
        metadata.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Some(metadata))
}

fn format_entry_line(entry: &LogEntry) -> String {
    let meta = if entry.metadata.is_some() {
        format!("  {}", entry.metadata_json())
    } else {
        String::new()
    };
    format!(
        "{}  {:<11} {}{}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category.label(),
        entry.action,
        meta
    )
}

fn seed_events(ledger: &EventLedger, count: usize) -> LedgerResult<usize> {
    use rand::Rng;

    let mut rng = rand::rng();
    let rigs = ["RIG-7742", "RIG-1088", "RIG-3305", "RIG-9121"];

    for _ in 0..count {
        let rig = rigs[rng.random_range(0..rigs.len())];
        let category = EventCategory::ALL[rng.random_range(0..EventCategory::ALL.len())];

        let mut metadata = Map::new();
        metadata.insert("rig".to_string(), Value::String(rig.to_string()));

        let action = match category {
            EventCategory::System => {
                metadata.insert(
                    "hashrate_ths".to_string(),
                    serde_json::json!(rng.random_range(80.0..140.0_f64).round()),
                );
                format!("telemetry heartbeat from {rig}")
            }
            EventCategory::Financial => {
                let amount = rng.random_range(0.001..0.05_f64);
                metadata.insert("btc".to_string(), serde_json::json!(format!("{amount:.5}")));
                "payout scheduled".to_string()
            }
            EventCategory::Security => "operator login verified".to_string(),
            EventCategory::Operation => format!("hashrate throttled on {rig}"),
            EventCategory::Ai => format!("optimizer retuned {rig}"),
            EventCategory::Marketplace => {
                metadata.insert(
                    "contract".to_string(),
                    Value::String(format!("CT-{}", rng.random_range(1000..9999))),
                );
                "hosting contract renewed".to_string()
            }
        };

        ledger.append(category, &action, Some(metadata))?;
    }
    Ok(count)
}
