use crate::canonical::{finite_f64, to_canonical_bytes};
use crate::crypto::sha256_hex;
use crate::error::Result;
use crate::transaction::{unix_timestamp, Transaction};
use serde::{Deserialize, Serialize};

/// `previous_hash` of the first block in every chain.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Index of the genesis block; indices are 1-based.
pub const GENESIS_INDEX: u64 = 1;

/// The record that is hashed. Field names are part of the hash input.
#[derive(Serialize)]
struct BlockRecord<'a> {
    index: u64,
    transactions: &'a [Transaction],
    #[serde(serialize_with = "finite_f64")]
    timestamp: f64,
    previous_hash: &'a str,
}

/// A sealed block. Write-once: there are no setters, and the hash is fixed
/// at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    transactions: Vec<Transaction>,
    #[serde(serialize_with = "finite_f64")]
    timestamp: f64,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Builds a block stamped with the current time. The transactions are
    /// copied, so later changes to the caller's buffer do not reach the block.
    pub fn new(index: u64, transactions: &[Transaction], previous_hash: impl Into<String>) -> Result<Self> {
        Self::with_timestamp(index, transactions.to_vec(), unix_timestamp(), previous_hash)
    }

    pub fn with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        timestamp: f64,
        previous_hash: impl Into<String>,
    ) -> Result<Self> {
        let previous_hash = previous_hash.into();
        let hash = Self::calculate_hash(index, &transactions, timestamp, &previous_hash)?;

        Ok(Block {
            index,
            transactions,
            timestamp,
            previous_hash,
            hash,
        })
    }

    pub fn genesis() -> Result<Self> {
        Self::new(GENESIS_INDEX, &[], GENESIS_PREVIOUS_HASH)
    }

    /// SHA-256 over the canonical encoding of
    /// `{index, previous_hash, timestamp, transactions}`, as lowercase hex.
    pub fn calculate_hash(
        index: u64,
        transactions: &[Transaction],
        timestamp: f64,
        previous_hash: &str,
    ) -> Result<String> {
        let record = BlockRecord {
            index,
            transactions,
            timestamp,
            previous_hash,
        };
        Ok(sha256_hex(&to_canonical_bytes(&record)?))
    }

    /// Recomputes the hash from the stored fields.
    pub fn recompute_hash(&self) -> Result<String> {
        Self::calculate_hash(
            self.index,
            &self.transactions,
            self.timestamp,
            &self.previous_hash,
        )
    }

    pub fn has_valid_hash(&self) -> bool {
        matches!(self.recompute_hash(), Ok(hash) if hash == self.hash)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}
