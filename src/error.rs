//! Error types for medledger

use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Integrity problems found by chain validation are never surfaced through
/// this enum; they are reported as data in a
/// [`ValidationReport`](crate::chain::ValidationReport) so a full audit is
/// always produced.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// I/O or encoding failure while reading or writing a record. Fatal:
    /// callers get the error as-is, nothing is retried.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A block was requested by number and is absent from the store.
    #[error("Block {0} not found")]
    BlockNotFound(u64),

    /// A transaction was requested by hash and is absent from the index.
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    /// Malformed digest or other hash-level input problem.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Missing or invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
