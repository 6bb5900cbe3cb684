#![forbid(unsafe_code)]
//! View recent ledger events, or look up one block or transaction.

use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use medledger::chain::ChainEngine;
use medledger::config::{load_config, DEFAULT_CONFIG_PATH};
use medledger::error::LedgerError;
use medledger::persistence::FileStore;

#[derive(Parser)]
#[command(name = "medledger-history", about = "Show recent ledger events")]
struct Cli {
    /// Number of recent transactions to show
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Show one block by number instead of the recent list
    #[arg(long)]
    block: Option<u64>,
    /// Show one transaction by hash instead of the recent list
    #[arg(long)]
    tx: Option<String>,
    /// Path to the config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let store = FileStore::open(&config.data_dir)?;
    let engine = ChainEngine::open(Box::new(store), &config.chain_id)?;

    if let Some(number) = cli.block {
        let block = engine
            .block(number)?
            .ok_or(LedgerError::BlockNotFound(number))?;
        println!("{}", serde_json::to_string_pretty(&block)?);
        return Ok(());
    }

    if let Some(hash) = &cli.tx {
        let stored = engine
            .transaction(hash)?
            .ok_or_else(|| LedgerError::TransactionNotFound(hash.clone()))?;
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    let recent = engine.recent_transactions(cli.limit)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Block"),
            Cell::new("Type"),
            Cell::new("Tx Hash"),
            Cell::new("Timestamp"),
        ]);

    for entry in &recent {
        let hash = entry.transaction.hash_str();
        table.add_row(vec![
            Cell::new(format!("#{}", entry.block_number)),
            Cell::new(&entry.transaction.tx_type),
            Cell::new(format!("{}...", &hash[..16])),
            Cell::new(&entry.transaction.timestamp),
        ]);
    }

    println!("{table}");
    Ok(())
}
