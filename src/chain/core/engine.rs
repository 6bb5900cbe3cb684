//! Chain engine: genesis creation, serialized appends, and read access.

use crate::block::Block;
use crate::chain::core::head::ChainHead;
use crate::chain::core::validation::{validate_chain, ValidationError, ValidationReport};
use crate::crypto::{hash_to_hex, ZERO_HASH};
use crate::error::Result;
use crate::persistence::LedgerStore;
use crate::transaction::{StoredTransaction, Transaction, GENESIS_TX_TYPE};
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Returned to the caller after a successful append.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub transaction_hash: String,
    pub block_number: u64,
    pub block_hash: String,
    pub timestamp: String,
}

/// Head-state snapshot plus a fresh integrity report, so callers always see
/// current status rather than cached state.
#[derive(Debug, Clone, Serialize)]
pub struct ChainStats {
    pub chain_id: String,
    pub total_blocks: u64,
    pub total_transactions: u64,
    pub latest_block_hash: String,
    pub valid: bool,
    pub blocks_verified: u64,
    pub errors: Vec<ValidationError>,
}

/// Single writer over a [`LedgerStore`]. The engine owns the in-memory head
/// cache and is the only mutator; construct one per chain and share it by
/// reference (no process-wide singleton, so tests can run isolated chains).
pub struct ChainEngine {
    store: Box<dyn LedgerStore>,
    head: Mutex<ChainHead>,
    nonce: AtomicU64,
}

impl ChainEngine {
    /// Opens the chain over `store`. On the first run (no head record) a
    /// genesis block is created and persisted; afterwards the persisted head
    /// is resumed and `chain_id` is ignored in favor of the stored one.
    pub fn open(store: Box<dyn LedgerStore>, chain_id: &str) -> Result<Self> {
        let head = match store.load_head()? {
            Some(head) => {
                log::info!(
                    "Resuming chain '{}' at height {}",
                    head.chain_id,
                    head.block_height
                );
                head
            }
            None => Self::create_genesis(store.as_ref(), chain_id)?,
        };

        Ok(ChainEngine {
            store,
            head: Mutex::new(head),
            // Random seed so two engine instances never replay the same
            // nonce sequence for identical payloads.
            nonce: AtomicU64::new(rand::random::<u32>() as u64),
        })
    }

    fn create_genesis(store: &dyn LedgerStore, chain_id: &str) -> Result<ChainHead> {
        let timestamp = now_rfc3339();
        let genesis_tx = Transaction::new(
            GENESIS_TX_TYPE,
            json!({ "chain_id": chain_id, "created_at": timestamp }),
            timestamp.clone(),
            0,
        );
        let block = Block::new(0, timestamp.clone(), ZERO_HASH, vec![genesis_tx]);
        store.put_block(&block)?;

        let head = ChainHead {
            block_height: 0,
            latest_block_hash: block.hash,
            total_transactions: 1,
            chain_id: chain_id.to_string(),
            genesis_timestamp: timestamp,
        };
        store.save_head(&head)?;
        log::info!("Created genesis block for chain '{}' ({})", chain_id, block.hash_str());
        Ok(head)
    }

    /// Appends one typed event as a single-transaction block.
    ///
    /// Appends are serialized by the head lock, so no two callers can observe
    /// the same head and race to write block N+1. Either the whole sequence
    /// (block write, then head write) completes, or the error is returned
    /// before the head advances and the previous head stays authoritative.
    pub fn append(&self, tx_type: &str, payload: Value) -> Result<Receipt> {
        let mut head = self.head.lock();

        let timestamp = now_rfc3339();
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let tx = Transaction::new(tx_type, payload, timestamp.clone(), nonce);
        let block = Block::new(
            head.block_height + 1,
            timestamp.clone(),
            head.latest_block_hash,
            vec![tx],
        );

        self.store.put_block(&block)?;

        let mut next = head.clone();
        next.block_height = block.number;
        next.latest_block_hash = block.hash;
        next.total_transactions += 1;
        self.store.save_head(&next)?;
        *head = next;

        log::debug!("Appended block {} ({})", block.number, block.hash_str());

        Ok(Receipt {
            transaction_hash: block.transactions[0].hash_str(),
            block_number: block.number,
            block_hash: block.hash_str(),
            timestamp,
        })
    }

    pub fn block(&self, number: u64) -> Result<Option<Block>> {
        self.store.block(number)
    }

    pub fn transaction(&self, hash: &str) -> Result<Option<StoredTransaction>> {
        self.store.transaction(hash)
    }

    /// Full-chain audit from genesis to the recorded head.
    pub fn validate(&self) -> Result<ValidationReport> {
        let block_height = self.head.lock().block_height;
        validate_chain(self.store.as_ref(), block_height)
    }

    pub fn stats(&self) -> Result<ChainStats> {
        let head = self.head.lock().clone();
        let report = validate_chain(self.store.as_ref(), head.block_height)?;
        Ok(ChainStats {
            chain_id: head.chain_id,
            total_blocks: head.block_height + 1,
            total_transactions: head.total_transactions,
            latest_block_hash: hash_to_hex(&head.latest_block_hash),
            valid: report.valid,
            blocks_verified: report.blocks_verified,
            errors: report.errors,
        })
    }

    /// At most `limit` transactions, most recent first, each annotated with
    /// its containing block. Walks blocks tail-to-genesis.
    pub fn recent_transactions(&self, limit: usize) -> Result<Vec<StoredTransaction>> {
        let mut out = Vec::new();
        if limit == 0 {
            return Ok(out);
        }

        let mut number = self.head.lock().block_height;
        loop {
            if let Some(block) = self.store.block(number)? {
                for tx in block.transactions.iter().rev() {
                    if out.len() == limit {
                        return Ok(out);
                    }
                    out.push(StoredTransaction {
                        transaction: tx.clone(),
                        block_number: block.number,
                        block_hash: block.hash,
                    });
                }
            }
            if number == 0 || out.len() == limit {
                return Ok(out);
            }
            number -= 1;
        }
    }

    /// Block numbers present in storage beyond the recorded head. Such
    /// orphans appear when a crash lands between the block write and the head
    /// write; they are reported for out-of-band repair, never adopted.
    pub fn orphan_blocks(&self) -> Result<Vec<u64>> {
        let block_height = self.head.lock().block_height;
        let numbers = self.store.block_numbers()?;
        Ok(numbers.into_iter().filter(|n| *n > block_height).collect())
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
