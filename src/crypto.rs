//! Cryptographic primitives for HashLedger

use crate::error::ChainError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{
        COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE,
    },
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Length of a raw `x || y` point without the SEC1 prefix byte.
pub const RAW_POINT_SIZE: usize = 64;

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from a raw 32-byte secret scalar.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(ChainError::MalformedKey(format!(
                "Secret key must be {} bytes, got {}",
                SECRET_KEY_SIZE,
                bytes.len()
            )));
        }
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| ChainError::MalformedKey(format!("Invalid secret key bytes: {}", e)))?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Returns the public key as a compressed SEC1 point.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.serialize()
    }

    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.secret_key.secret_bytes()
    }

    /// Signs a message (which is first hashed using SHA-256) and returns the compact signature bytes.
    /// Signers that digest with SHA-1 (python-ecdsa's default) produce signatures this will not verify.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], ChainError> {
        let digest = Sha256::digest(message);

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ChainError::SigningError(format!("Failed to create message: {}", e)))?;

        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        Ok(signature.serialize_compact())
    }
}

/// Parses a secp256k1 point given as compressed (33), uncompressed (65) or
/// raw `x || y` (64) bytes.
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, ChainError> {
    let parsed = match bytes.len() {
        PUBLIC_KEY_SIZE | UNCOMPRESSED_PUBLIC_KEY_SIZE => PublicKey::from_slice(bytes),
        RAW_POINT_SIZE => {
            let mut sec1 = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
            sec1[0] = 0x04;
            sec1[1..].copy_from_slice(bytes);
            PublicKey::from_slice(&sec1)
        }
        other => {
            return Err(ChainError::MalformedKey(format!(
                "Public key must be {}, {} or {} bytes, got {}",
                PUBLIC_KEY_SIZE, RAW_POINT_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE, other
            )))
        }
    };
    parsed.map_err(|e| ChainError::MalformedKey(format!("Invalid public key: {}", e)))
}

/// Verifies an ECDSA signature given the raw public key bytes, message, and signature bytes.
///
/// Each failure is reported with its own kind so the caller can map all of
/// them at one place: [`ChainError::MalformedKey`], [`ChainError::MalformedSignature`]
/// or [`ChainError::InvalidSignature`].
pub fn verify_signature(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<(), ChainError> {
    let public_key = parse_public_key(public_key_bytes)?;

    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(ChainError::MalformedSignature(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }
    let mut signature = Signature::from_compact(signature_bytes)
        .map_err(|e| ChainError::MalformedSignature(format!("Invalid signature: {}", e)))?;
    // libsecp256k1 only accepts low-S; the high-S twin is an equally valid signature.
    signature.normalize_s();

    let digest = Sha256::digest(message);
    let message = Message::from_digest_slice(&digest)
        .map_err(|e| ChainError::MalformedSignature(format!("Failed to create message: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| ChainError::InvalidSignature)
}

/// Wire form of a signature: standard base64 of the raw compact bytes.
pub fn encode_signature(signature: &[u8]) -> String {
    BASE64.encode(signature)
}

pub fn decode_signature(encoded: &str) -> Result<Vec<u8>, ChainError> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| ChainError::MalformedSignature(format!("Invalid base64: {}", e)))
}

/// Decodes key material typed or configured as hex, with an optional `0x` prefix.
pub fn decode_key_hex(text: &str) -> Result<Vec<u8>, ChainError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| ChainError::MalformedKey(format!("Invalid hex key: {}", e)))
}
