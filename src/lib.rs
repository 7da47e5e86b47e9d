//! HashLedger - an append-only ledger of signed transfers in hash-linked blocks
//!
//! # Architecture
//!
//! ## Integrity Core
//! - [`canonical`] - Deterministic encoding shared by signing and hashing
//! - [`transaction`] - Transaction value object, signing and verification
//! - [`blockchain`] - Blocks, the ledger, and whole-chain validation
//!
//! ## Cryptography
//! - [`crypto`] - secp256k1 keys, compact signatures, SHA-256
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Interactive shell

#![forbid(unsafe_code)]

// ============================================================================
// Integrity Core
// ============================================================================
pub mod blockchain;
pub mod canonical;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use blockchain::{validate_chain, Block, Ledger, GENESIS_PREVIOUS_HASH};
pub use crypto::KeyPair;
pub use error::{ChainError, Result};
pub use transaction::{Transaction, TransactionFields};
