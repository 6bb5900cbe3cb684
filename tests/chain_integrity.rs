//! End-to-end integrity tests over the file-backed store.
//!
//! These exercise the full append path (block file, transaction index, head
//! record) and verify that on-disk tampering is caught by the audit walk.

use medledger::chain::{ChainEngine, CheckFailure};
use medledger::crypto::ZERO_HASH;
use medledger::persistence::{FileStore, LedgerStore};
use medledger::transaction::GENESIS_TX_TYPE;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn open_engine(dir: &Path) -> ChainEngine {
    let store = FileStore::open(dir).expect("Failed to open store");
    ChainEngine::open(Box::new(store), "clinic-test").expect("Failed to open chain")
}

fn block_file(dir: &Path, number: u64) -> std::path::PathBuf {
    dir.join("blocks").join(format!("{:012}.json", number))
}

#[test]
fn fresh_chain_has_a_valid_genesis() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    let genesis = engine.block(0).unwrap().unwrap();
    assert_eq!(genesis.number, 0);
    assert_eq!(genesis.previous_hash, ZERO_HASH);
    assert_eq!(genesis.transactions.len(), 1);
    assert_eq!(genesis.transactions[0].tx_type, GENESIS_TX_TYPE);

    let report = engine.validate().unwrap();
    assert!(report.valid);
    assert_eq!(report.blocks_verified, 1);
    assert!(report.errors.is_empty());
}

#[test]
fn did_and_consent_scenario_links_up() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    engine
        .append("DID_REGISTRATION", json!({"nik": "123"}))
        .unwrap();
    engine
        .append("CONSENT_GRANTED", json!({"consentId": "C1"}))
        .unwrap();

    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_blocks, 3);
    assert_eq!(stats.total_transactions, 3);
    assert!(stats.valid);

    let b0 = engine.block(0).unwrap().unwrap();
    let b1 = engine.block(1).unwrap().unwrap();
    let b2 = engine.block(2).unwrap().unwrap();
    assert_eq!(b1.previous_hash, b0.hash);
    assert_eq!(b2.previous_hash, b1.hash);
    assert!(engine.validate().unwrap().valid);
}

#[test]
fn total_blocks_tracks_appends() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    for i in 0..7 {
        engine.append("ACCESS_LOGGED", json!({"seq": i})).unwrap();
    }

    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_blocks, 8);
    assert_eq!(stats.blocks_verified, 8);
}

#[test]
fn tampering_a_block_file_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    engine
        .append("DID_REGISTRATION", json!({"nik": "123"}))
        .unwrap();
    engine
        .append("CONSENT_GRANTED", json!({"consentId": "C1"}))
        .unwrap();
    assert!(engine.validate().unwrap().valid);

    // Rewrite block 1's payload on disk, leaving every hash untouched.
    let path = block_file(dir.path(), 1);
    let mut record: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    record["transactions"][0]["payload"]["nik"] = json!("999");
    fs::write(&path, serde_json::to_string_pretty(&record).unwrap()).unwrap();

    let report = engine.validate().unwrap();
    assert!(!report.valid);
    assert!(!report.errors.is_empty());
    assert!(report.errors.iter().all(|e| e.block_number == 1));
    assert!(report
        .errors
        .iter()
        .any(|e| e.failure == CheckFailure::MerkleMismatch));
}

#[test]
fn deleting_a_block_file_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());
    engine.append("EVENT", json!({})).unwrap();
    engine.append("EVENT", json!({})).unwrap();

    fs::remove_file(block_file(dir.path(), 1)).unwrap();

    let report = engine.validate().unwrap();
    assert!(!report.valid);
    assert_eq!(report.blocks_verified, 2);
    assert!(report
        .errors
        .iter()
        .any(|e| e.block_number == 1 && e.failure == CheckFailure::NotFound));
}

#[test]
fn reopening_resumes_the_persisted_head() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = open_engine(dir.path());
        engine.append("EVENT", json!({"run": 1})).unwrap();
    }

    // Second open must resume, not recreate genesis.
    let engine = open_engine(dir.path());
    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_blocks, 2);
    assert_eq!(stats.chain_id, "clinic-test");

    let receipt = engine.append("EVENT", json!({"run": 2})).unwrap();
    assert_eq!(receipt.block_number, 2);
    assert!(engine.validate().unwrap().valid);
}

#[test]
fn recent_transactions_returns_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    let mut receipts = Vec::new();
    for i in 0..5 {
        receipts.push(engine.append("EVENT", json!({"seq": i})).unwrap());
    }

    let recent = engine.recent_transactions(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(
        recent[0].transaction.hash_str(),
        receipts[4].transaction_hash
    );
    assert_eq!(
        recent[1].transaction.hash_str(),
        receipts[3].transaction_hash
    );
    assert_eq!(recent[0].block_number, 5);
    assert_eq!(recent[1].block_number, 4);
}

#[test]
fn transaction_index_points_back_to_its_block() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());

    let receipt = engine
        .append("CONSENT_REVOKED", json!({"consentId": "C7"}))
        .unwrap();

    let stored = engine
        .transaction(&receipt.transaction_hash)
        .unwrap()
        .unwrap();
    assert_eq!(stored.block_number, receipt.block_number);
    assert_eq!(stored.transaction.tx_type, "CONSENT_REVOKED");

    // Lookup goes through the transactions directory, one file per hash.
    assert!(dir
        .path()
        .join("transactions")
        .join(format!("{}.json", receipt.transaction_hash))
        .exists());
}

#[test]
fn orphan_blocks_beyond_the_head_are_listed_but_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path());
    engine.append("EVENT", json!({})).unwrap();
    engine.append("EVENT", json!({})).unwrap();

    // Simulate a crash that wrote block 3 but never advanced the head.
    fs::copy(block_file(dir.path(), 2), block_file(dir.path(), 3)).unwrap();

    assert_eq!(engine.orphan_blocks().unwrap(), vec![3]);
    // The audit walks the declared height only, so the chain stays valid.
    let report = engine.validate().unwrap();
    assert!(report.valid);
    assert_eq!(report.blocks_verified, 3);
}

#[test]
fn two_stores_in_one_process_stay_isolated() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let engine_a = open_engine(dir_a.path());
    let engine_b = open_engine(dir_b.path());
    engine_a.append("EVENT", json!({"chain": "a"})).unwrap();

    assert_eq!(engine_a.stats().unwrap().total_blocks, 2);
    assert_eq!(engine_b.stats().unwrap().total_blocks, 1);

    // Distinct genesis timestamps/nonces give distinct chain tips.
    let store_b = FileStore::open(dir_b.path()).unwrap();
    assert_eq!(store_b.block_numbers().unwrap(), vec![0]);
}
