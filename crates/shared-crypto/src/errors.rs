//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
///
/// `KeyGenerationFailed` and `SigningFailed` are fatal to the operation.
/// `InvalidPublicKey` and `InvalidSignatureFormat` mean the material handed
/// to `verify` is malformed; a well-formed signature that simply does not
/// match is reported as `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid signature format
    #[error("Invalid signature format: expected {expected} bytes, got {actual}")]
    InvalidSignatureFormat {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key material could not be decoded from hex
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Key file could not be read or written
    #[error("Key store error: {0}")]
    KeyStore(#[from] std::io::Error),
}

impl CryptoError {
    /// True for errors raised while checking a signature (malformed input).
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidPublicKey | CryptoError::InvalidSignatureFormat { .. }
        )
    }
}
