#![forbid(unsafe_code)]
//! Append one audit event to the ledger from the command line.

use clap::Parser;
use colored::*;
use medledger::chain::ChainEngine;
use medledger::config::{load_config, DEFAULT_CONFIG_PATH};
use medledger::persistence::FileStore;

#[derive(Parser)]
#[command(name = "medledger-append", about = "Append a typed audit event to the ledger")]
struct Cli {
    /// Event type tag, e.g. DID_REGISTRATION or CONSENT_GRANTED
    tx_type: String,
    /// Event payload as a JSON document
    payload: String,
    /// Path to the config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let payload: serde_json::Value = serde_json::from_str(&cli.payload)
        .map_err(|e| format!("Payload is not valid JSON: {}", e))?;

    let config = load_config(&cli.config)?;
    let store = FileStore::open(&config.data_dir)?;
    let engine = ChainEngine::open(Box::new(store), &config.chain_id)?;

    let receipt = engine.append(&cli.tx_type, payload)?;

    println!("{}", "Event appended".green().bold());
    println!("  block number: {}", receipt.block_number);
    println!("  block hash:   {}", receipt.block_hash);
    println!("  tx hash:      {}", receipt.transaction_hash);
    println!("  timestamp:    {}", receipt.timestamp);

    Ok(())
}
