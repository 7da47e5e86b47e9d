/// Signing and signature checks, kept apart from the type definitions
use crate::crypto::{self, KeyPair};
use crate::error::{ChainError, Result};
use crate::transaction::types::{Transaction, TransactionFields};
use tracing::debug;

impl Transaction {
    /// Signs the canonical encoding with a raw 32-byte secp256k1 secret key
    /// and returns the base64 wire form of the compact signature.
    pub fn sign(&self, private_key: &[u8]) -> Result<String> {
        let keypair = KeyPair::from_secret_bytes(private_key)
            .map_err(|e| ChainError::SigningError(e.to_string()))?;
        self.sign_with(&keypair)
    }

    pub fn sign_with(&self, keypair: &KeyPair) -> Result<String> {
        let message = self.canonical_bytes()?;
        let signature = keypair.sign(&message)?;
        Ok(crypto::encode_signature(&signature))
    }

    /// Answers whether `signature` authenticates `fields` under `public_key`.
    ///
    /// Total: malformed keys, undecodable signatures and encoding failures
    /// all answer `false`.
    pub fn verify(fields: &TransactionFields, signature: &str, public_key: &[u8]) -> bool {
        match Self::check_signature(fields, signature, public_key) {
            Ok(()) => true,
            Err(e) => {
                debug!(reason = %e, "signature rejected");
                false
            }
        }
    }

    /// Tagged form of [`Transaction::verify`]. Every failure is one of
    /// `InvalidSignature`, `MalformedKey`, `MalformedSignature` or `EncodingError`.
    pub fn check_signature(
        fields: &TransactionFields,
        signature: &str,
        public_key: &[u8],
    ) -> Result<()> {
        let message = fields.canonical_bytes()?;
        let signature_bytes = crypto::decode_signature(signature)?;
        crypto::verify_signature(public_key, &message, &signature_bytes)
    }

    /// Checks `signature` against the sender key the transaction declares.
    pub fn verify_signature(&self, signature: &str) -> Result<()> {
        Self::check_signature(self.fields(), signature, self.sender())
    }
}
