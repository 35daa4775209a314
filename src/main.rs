// rigledger - main.rs
// Bootstrap runner for the rig console event ledger

use std::fs;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;

use rigledger::cli::{dispatch, Cli};
use rigledger::config_loader::load_config;
use rigledger::ledger_store::{EventLedger, LedgerBackend};
use rigledger::ledger_store_memory::MemoryBackend;
use rigledger::ledger_store_sled::SledBackend;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config().context("loading configuration")?;

    let level = tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let backend: Box<dyn LedgerBackend> = match config.backend.as_str() {
        "memory" => Box::new(MemoryBackend::new()),
        _ => {
            fs::create_dir_all(&config.data_dir)
                .with_context(|| format!("creating data directory {}", config.data_dir))?;
            let backend =
                SledBackend::open(&config.db_path()).context("opening ledger database")?;
            Box::new(backend)
        }
    };

    let ledger = EventLedger::open(backend, config.capacity).context("opening event ledger")?;

    dispatch(cli, &ledger, &config)?;
    Ok(())
}
