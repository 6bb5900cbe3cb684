#![forbid(unsafe_code)]
//! Run the full-chain integrity audit and print the report.

use clap::Parser;
use colored::*;
use medledger::chain::ChainEngine;
use medledger::config::{load_config, DEFAULT_CONFIG_PATH};
use medledger::persistence::FileStore;

#[derive(Parser)]
#[command(name = "medledger-verify", about = "Audit the ledger from genesis to head")]
struct Cli {
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

    let stats = engine.stats()?;
    println!("chain:              {}", stats.chain_id);
    println!("total blocks:       {}", stats.total_blocks);
    println!("total transactions: {}", stats.total_transactions);
    println!("latest block hash:  {}", stats.latest_block_hash);
    println!("blocks verified:    {}", stats.blocks_verified);

    let orphans = engine.orphan_blocks()?;
    if !orphans.is_empty() {
        println!(
            "{}",
            format!("orphan blocks beyond head: {:?}", orphans).yellow()
        );
    }

    if stats.valid {
        println!("{}", "chain is VALID".green().bold());
        Ok(())
    } else {
        println!("{}", "chain is INVALID".red().bold());
        for error in &stats.errors {
            println!(
                "{}",
                format!("  block {}: {:?}", error.block_number, error.failure).red()
            );
        }
        std::process::exit(1);
    }
}
