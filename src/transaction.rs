//! Transaction record and canonical hashing.

use crate::crypto::{hex_digest, Sha256Hash};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Type tag of the synthetic transaction carried by every genesis block.
pub const GENESIS_TX_TYPE: &str = "GENESIS";

/// A single typed audit event. Immutable once hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Free-form type tag, e.g. `DID_REGISTRATION` or `CONSENT_GRANTED`.
    pub tx_type: String,
    /// Opaque structured data supplied by the caller.
    pub payload: Value,
    /// RFC-3339 creation time.
    pub timestamp: String,
    /// Uniqueness salt so identical payload+timestamp never collide.
    pub nonce: u64,
    #[serde(with = "hex_digest")]
    pub hash: Sha256Hash,
}

impl Transaction {
    /// Builds a transaction and seals it with its content hash.
    pub fn new(tx_type: impl Into<String>, payload: Value, timestamp: String, nonce: u64) -> Self {
        let mut tx = Transaction {
            tx_type: tx_type.into(),
            payload,
            timestamp,
            nonce,
            hash: [0u8; 32],
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Digest over the canonical encoding of every field except `hash`.
    ///
    /// Scalar fields are fed to the hasher in fixed order; payload bytes come
    /// from serde_json, whose object maps keep sorted keys, so the encoding
    /// is stable across runs and insertion orders.
    pub fn compute_hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.tx_type.as_bytes());
        hasher.update(canonical_payload(&self.payload));
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash)
    }
}

fn canonical_payload(payload: &Value) -> Vec<u8> {
    // serde_json::Value always has string map keys, so this cannot fail.
    serde_json::to_vec(payload).expect("serializing a JSON value never fails")
}

/// Transaction as indexed on disk, carrying a back-reference to its block so
/// lookup by hash never scans the block files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub block_number: u64,
    #[serde(with = "hex_digest")]
    pub block_hash: Sha256Hash,
}
