//! Chain head state, the single mutable record in an otherwise append-only
//! structure.

use crate::crypto::{hex_digest, Sha256Hash};
use serde::{Deserialize, Serialize};

/// Pointer to the current chain tail. Created once at genesis, rewritten
/// after every successful append, never rolled back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainHead {
    /// Height of the latest block; 0 right after genesis.
    pub block_height: u64,
    #[serde(with = "hex_digest")]
    pub latest_block_hash: Sha256Hash,
    /// Running transaction counter, genesis included.
    pub total_transactions: u64,
    pub chain_id: String,
    pub genesis_timestamp: String,
}
