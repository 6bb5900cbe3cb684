//! Ledger store: durable persistence for blocks, transactions and the chain
//! head (one JSON record per file, plus an in-memory backend for tests).

use crate::block::Block;
use crate::chain::ChainHead;
use crate::error::{LedgerError, Result};
use crate::transaction::StoredTransaction;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Abstraction for ledger persistence backends. Implementations must make
/// each write atomic from a reader's perspective: a reader never observes a
/// partially written record.
pub trait LedgerStore: Send + Sync {
    /// Persists a block keyed by number and indexes every contained
    /// transaction by hash, together with its containing block.
    fn put_block(&self, block: &Block) -> Result<()>;
    fn block(&self, number: u64) -> Result<Option<Block>>;
    fn transaction(&self, hash: &str) -> Result<Option<StoredTransaction>>;
    /// `None` only on the first-ever run, before genesis is persisted.
    fn load_head(&self) -> Result<Option<ChainHead>>;
    /// Overwrites the singleton head record.
    fn save_head(&self, head: &ChainHead) -> Result<()>;
    /// All block numbers present in storage, ascending. Used by the orphan
    /// scan; may exceed the recorded head after a crash.
    fn block_numbers(&self) -> Result<Vec<u64>>;
}

/// Width of the zero-padded block key, so lexicographic and numeric order
/// coincide.
const BLOCK_KEY_WIDTH: usize = 12;

/// File-backed store. Blocks, transactions and the head live in separate
/// directories so a transaction lookup never scans block files.
pub struct FileStore {
    blocks_dir: PathBuf,
    transactions_dir: PathBuf,
    head_path: PathBuf,
}

impl FileStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let store = FileStore {
            blocks_dir: data_dir.join("blocks"),
            transactions_dir: data_dir.join("transactions"),
            head_path: data_dir.join("head.json"),
        };
        fs::create_dir_all(&store.blocks_dir).map_err(|e| {
            LedgerError::Storage(format!("Failed to create blocks directory: {}", e))
        })?;
        fs::create_dir_all(&store.transactions_dir).map_err(|e| {
            LedgerError::Storage(format!("Failed to create transactions directory: {}", e))
        })?;
        Ok(store)
    }

    fn block_path(&self, number: u64) -> PathBuf {
        self.blocks_dir
            .join(format!("{:0width$}.json", number, width = BLOCK_KEY_WIDTH))
    }

    fn transaction_path(&self, hash: &str) -> PathBuf {
        self.transactions_dir.join(format!("{}.json", hash))
    }

    /// Temp-file-then-rename in the target directory, so the swap is atomic
    /// on the same filesystem.
    fn write_atomic<T: Serialize>(path: &Path, record: &T) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| LedgerError::Storage(format!("No parent directory for {}", path.display())))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), record)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize record: {}", e)))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| LedgerError::Storage(format!("Failed to sync record: {}", e)))?;
        tmp.persist(path)
            .map_err(|e| LedgerError::Storage(format!("Failed to persist {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LedgerError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let record = serde_json::from_slice(&data).map_err(|e| {
            LedgerError::Storage(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        Ok(Some(record))
    }
}

impl LedgerStore for FileStore {
    fn put_block(&self, block: &Block) -> Result<()> {
        Self::write_atomic(&self.block_path(block.number), block)?;
        for tx in &block.transactions {
            let stored = StoredTransaction {
                transaction: tx.clone(),
                block_number: block.number,
                block_hash: block.hash,
            };
            Self::write_atomic(&self.transaction_path(&tx.hash_str()), &stored)?;
        }
        Ok(())
    }

    fn block(&self, number: u64) -> Result<Option<Block>> {
        Self::read_json(&self.block_path(number))
    }

    fn transaction(&self, hash: &str) -> Result<Option<StoredTransaction>> {
        Self::read_json(&self.transaction_path(hash))
    }

    fn load_head(&self) -> Result<Option<ChainHead>> {
        Self::read_json(&self.head_path)
    }

    fn save_head(&self, head: &ChainHead) -> Result<()> {
        Self::write_atomic(&self.head_path, head)
    }

    fn block_numbers(&self) -> Result<Vec<u64>> {
        let mut numbers = Vec::new();
        let entries = fs::read_dir(&self.blocks_dir).map_err(|e| {
            LedgerError::Storage(format!("Failed to list blocks directory: {}", e))
        })?;
        for entry in entries {
            let entry = entry
                .map_err(|e| LedgerError::Storage(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(number) = stem.parse::<u64>() {
                    numbers.push(number);
                }
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }
}

/// Simple in-memory store useful for tests and ephemeral chains.
#[derive(Default)]
pub struct MemoryStore {
    blocks: Mutex<BTreeMap<u64, Block>>,
    transactions: Mutex<HashMap<String, StoredTransaction>>,
    head: Mutex<Option<ChainHead>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct block replacement, bypassing hashing. Test hook for simulating
    /// on-disk tampering.
    pub fn overwrite_block(&self, block: Block) {
        self.blocks.lock().insert(block.number, block);
    }
}

impl LedgerStore for MemoryStore {
    fn put_block(&self, block: &Block) -> Result<()> {
        self.blocks.lock().insert(block.number, block.clone());
        let mut transactions = self.transactions.lock();
        for tx in &block.transactions {
            transactions.insert(
                tx.hash_str(),
                StoredTransaction {
                    transaction: tx.clone(),
                    block_number: block.number,
                    block_hash: block.hash,
                },
            );
        }
        Ok(())
    }

    fn block(&self, number: u64) -> Result<Option<Block>> {
        Ok(self.blocks.lock().get(&number).cloned())
    }

    fn transaction(&self, hash: &str) -> Result<Option<StoredTransaction>> {
        Ok(self.transactions.lock().get(hash).cloned())
    }

    fn load_head(&self) -> Result<Option<ChainHead>> {
        Ok(self.head.lock().clone())
    }

    fn save_head(&self, head: &ChainHead) -> Result<()> {
        *self.head.lock() = Some(head.clone());
        Ok(())
    }

    fn block_numbers(&self) -> Result<Vec<u64>> {
        Ok(self.blocks.lock().keys().copied().collect())
    }
}
