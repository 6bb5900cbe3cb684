//! medledger - an append-only, file-persisted audit hash-chain
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`chain`] - Chain engine, head state and integrity validation
//! - [`transaction`] - Transaction record and canonical hashing
//! - [`block`] - Block structure and header hashing
//! - [`merkle`] - Merkle accumulator over a block's transactions
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 digest primitive and hex helpers
//!
//! ## State Management
//! - [`persistence`] - File-backed ledger store (plus in-memory backend)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod chain;
pub mod merkle;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// State Management
// ============================================================================
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
