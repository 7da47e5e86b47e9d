/// Transaction types for HashLedger
use crate::canonical::{finite_f64, to_canonical_bytes, to_canonical_string};
use crate::crypto::sha256_hex;
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, microsecond precision.
pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// The exact field set that is signed and hashed.
///
/// `sender` is the declared public key of the signer, carried as raw point
/// bytes and written as lowercase hex in the canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFields {
    #[serde(with = "hex::serde")]
    pub sender: Vec<u8>,
    pub recipient: String,
    #[serde(serialize_with = "finite_f64")]
    pub amount: f64,
    #[serde(serialize_with = "finite_f64")]
    pub timestamp: f64,
}

impl TransactionFields {
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        to_canonical_bytes(self)
    }
}

/// A value transfer. Fields are fixed once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionFields", into = "TransactionFields")]
pub struct Transaction {
    fields: TransactionFields,
}

impl TryFrom<TransactionFields> for Transaction {
    type Error = ChainError;

    fn try_from(fields: TransactionFields) -> Result<Self> {
        Transaction::from_fields(fields)
    }
}

impl From<Transaction> for TransactionFields {
    fn from(tx: Transaction) -> Self {
        tx.fields
    }
}

impl Transaction {
    /// Creates a transaction stamped with the current time.
    pub fn new(sender: impl Into<Vec<u8>>, recipient: impl Into<String>, amount: f64) -> Result<Self> {
        Self::from_fields(TransactionFields {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            timestamp: unix_timestamp(),
        })
    }

    /// Rebuilds a transaction from a previously recorded field set.
    pub fn from_fields(fields: TransactionFields) -> Result<Self> {
        if !fields.amount.is_finite() {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount must be a finite number, got {}",
                fields.amount
            )));
        }
        if !fields.timestamp.is_finite() {
            return Err(ChainError::InvalidTransaction(format!(
                "Timestamp must be a finite number, got {}",
                fields.timestamp
            )));
        }
        Ok(Transaction { fields })
    }

    pub fn sender(&self) -> &[u8] {
        &self.fields.sender
    }

    pub fn recipient(&self) -> &str {
        &self.fields.recipient
    }

    pub fn amount(&self) -> f64 {
        self.fields.amount
    }

    pub fn timestamp(&self) -> f64 {
        self.fields.timestamp
    }

    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn to_fields(&self) -> TransactionFields {
        self.fields.clone()
    }

    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        self.fields.canonical_bytes()
    }

    /// Canonical JSON text, as shown to users.
    pub fn canonical_string(&self) -> Result<String> {
        to_canonical_string(&self.fields)
    }

    /// Lowercase hex SHA-256 of the canonical encoding.
    pub fn hash(&self) -> Result<String> {
        Ok(sha256_hex(&self.canonical_bytes()?))
    }
}
