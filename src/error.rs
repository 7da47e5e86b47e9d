//! Error types for HashLedger

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("Invalid transaction signature")]
    InvalidSignature,
    #[error("Malformed key: {0}")]
    MalformedKey(String),
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
    #[error("Cannot sign transaction: {0}")]
    SigningError(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Encoding error: {0}")]
    EncodingError(String),
    #[error("Chain invariant violated: block sequence is empty")]
    EmptyChain,
    #[error("Invalid block {index}: {reason}")]
    InvalidBlock { index: u64, reason: String },
    #[error("Invalid block linkage at block {index}: expected previous hash {expected}, got {found}")]
    InvalidBlockLinkage {
        index: u64,
        expected: String,
        found: String,
    },
    #[error("Block hash mismatch at block {index}: computed {expected}, stored {found}")]
    BlockHashMismatch {
        index: u64,
        expected: String,
        found: String,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl ChainError {
    /// True for every failure that means "this submission is not authentic".
    /// The ledger treats all of them the same way: reject, change nothing.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            ChainError::InvalidSignature
                | ChainError::MalformedKey(_)
                | ChainError::MalformedSignature(_)
        )
    }
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::EncodingError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
