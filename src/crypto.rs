//! Cryptographic primitives for medledger

use crate::error::LedgerError;
use sha2::{Digest, Sha256};

/// Type alias for the ledger digest, a 32-byte SHA-256 hash.
/// We use a fixed-size array for internal type safety and performance.
pub type Sha256Hash = [u8; 32];

/// The all-zero digest. Genesis blocks point at it instead of a prior block;
/// on disk it renders as 64 zero hex characters.
pub const ZERO_HASH: Sha256Hash = [0u8; 32];

/// Computes the SHA-256 digest of an arbitrary byte string.
/// Deterministic, keyless and infallible.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Convert a digest to a hex string for display and storage keys.
pub fn hash_to_hex(hash: &Sha256Hash) -> String {
    hex::encode(hash)
}

/// Convert a hex string back to a digest.
pub fn hash_from_hex(hex_str: &str) -> Result<Sha256Hash, LedgerError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| LedgerError::Crypto(format!("Invalid hex digest: {}", e)))?;
    if bytes.len() != 32 {
        return Err(LedgerError::Crypto(format!(
            "Digest must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| LedgerError::Crypto("Failed to convert bytes into digest".to_string()))
}

/// Serde adapter so digest fields persist as hex strings in JSON records.
pub mod hex_digest {
    use super::Sha256Hash;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Sha256Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Sha256Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("digest must be 32 bytes"))
    }
}
