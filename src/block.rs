//! Block structure and header hashing.

use crate::crypto::{hex_digest, Sha256Hash, ZERO_HASH};
use crate::merkle::merkle_root;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One link of the hash chain. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Height of this block; 0 is genesis.
    pub number: u64,
    /// RFC-3339 creation time.
    pub timestamp: String,
    /// Hash of the prior block, [`ZERO_HASH`] for genesis.
    #[serde(with = "hex_digest")]
    pub previous_hash: Sha256Hash,
    /// Ordered, non-empty transaction sequence.
    pub transactions: Vec<Transaction>,
    #[serde(with = "hex_digest")]
    pub merkle_root: Sha256Hash,
    /// Reserved for proof-of-work; always 0, there is no mining loop.
    pub nonce: u64,
    #[serde(with = "hex_digest")]
    pub hash: Sha256Hash,
}

impl Block {
    /// Assembles a block over `transactions`, computing its Merkle root and
    /// sealing it with the header hash.
    pub fn new(
        number: u64,
        timestamp: String,
        previous_hash: Sha256Hash,
        transactions: Vec<Transaction>,
    ) -> Self {
        let root = merkle_root(&transactions);
        let mut block = Block {
            number,
            timestamp,
            previous_hash,
            transactions,
            merkle_root: root,
            nonce: 0,
            hash: ZERO_HASH,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Digest over the header fields, excluding `hash` itself.
    pub fn compute_hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_le_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.previous_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }
}
