//! Merkle accumulator combining a block's transaction digests into one root.

use crate::crypto::{sha256, Sha256Hash};
use crate::transaction::Transaction;

/// Sentinel hashed as the root of an empty transaction list. The chain engine
/// never persists empty blocks, but the sentinel keeps the root well-defined
/// and distinguishable for every input.
const EMPTY_BLOCK_TAG: &[u8] = b"empty-block";

/// Computes the Merkle root over an ordered transaction sequence.
///
/// Leaves are the digests of each transaction's canonical encoding, in
/// sequence order. Levels are combined pairwise left-to-right; an odd node
/// out is paired with itself (duplicate-last-node rule), never promoted
/// unchanged. Validation of existing data depends on this exact rule.
pub fn merkle_root(transactions: &[Transaction]) -> Sha256Hash {
    if transactions.is_empty() {
        return sha256(EMPTY_BLOCK_TAG);
    }

    let mut level: Vec<Sha256Hash> = transactions.iter().map(|tx| tx.compute_hash()).collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            // A lone trailing node pairs with itself.
            let right = pair.get(1).copied().unwrap_or(left);
            next.push(combine(&left, &right));
        }
        level = next;
    }

    level[0]
}

fn combine(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    sha256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(tag: &str) -> Transaction {
        Transaction::new(tag, json!({"id": tag}), "2026-01-01T00:00:00.000Z".to_string(), 0)
    }

    #[test]
    fn test_empty_list_uses_sentinel() {
        assert_eq!(merkle_root(&[]), sha256(EMPTY_BLOCK_TAG));
    }

    #[test]
    fn test_single_transaction_root_is_its_leaf() {
        let t = tx("A");
        assert_eq!(merkle_root(&[t.clone()]), t.compute_hash());
    }

    #[test]
    fn test_two_transactions_combine_in_order() {
        let (a, b) = (tx("A"), tx("B"));
        let expected = combine(&a.compute_hash(), &b.compute_hash());
        assert_eq!(merkle_root(&[a, b]), expected);
    }

    #[test]
    fn test_odd_count_duplicates_last_leaf() {
        let (a, b, c) = (tx("A"), tx("B"), tx("C"));
        let ab = combine(&a.compute_hash(), &b.compute_hash());
        let cc = combine(&c.compute_hash(), &c.compute_hash());
        let expected = combine(&ab, &cc);
        assert_eq!(merkle_root(&[a, b, c]), expected);
    }

    #[test]
    fn test_root_is_order_sensitive() {
        let (a, b) = (tx("A"), tx("B"));
        assert_ne!(
            merkle_root(&[a.clone(), b.clone()]),
            merkle_root(&[b, a])
        );
    }

    #[test]
    fn test_root_is_deterministic() {
        let txs = vec![tx("A"), tx("B"), tx("C"), tx("D"), tx("E")];
        assert_eq!(merkle_root(&txs), merkle_root(&txs));
    }
}
