//! # Domain Errors
//!
//! Error types for the page ledger.

use cl_01_validator_registry::RegistryError;
use shared_crypto::CryptoError;
use shared_types::{StoreError, Timestamp};
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Every failing call leaves the ledger exactly as it was.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The signer is unknown or not active at admission time.
    #[error("Unauthorized signer {identity}: {reason}")]
    UnauthorizedSigner { identity: String, reason: String },

    /// `submit` was called before genesis.
    #[error("Ledger not initialized: create the genesis page first")]
    LedgerNotInitialized,

    /// A page already exists at index 0.
    #[error("Genesis page already exists")]
    GenesisAlreadyExists,

    /// Genesis parameters or the stored genesis record are malformed.
    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    /// The supplied private key does not belong to the signer.
    #[error("Signing key does not match the registered key of {identity}")]
    KeyMismatch { identity: String },

    /// The record itself was rejected (empty labels, oversized payload).
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The clock reads earlier than the newest committed page.
    #[error("Clock regression: now {now} is not after ledger tip {tip}")]
    ClockRegression { tip: Timestamp, now: Timestamp },

    /// The signature service failed.
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// Registry failure other than an authorization refusal.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The page store refused the write.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl LedgerError {
    /// Translate an authorization refusal, keep other registry errors as they are.
    pub(crate) fn from_authorization(identity: &str, err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownIdentity(_) => LedgerError::UnauthorizedSigner {
                identity: identity.to_string(),
                reason: "not a registered validator".to_string(),
            },
            RegistryError::InactiveValidator { id, .. } => LedgerError::UnauthorizedSigner {
                identity: identity.to_string(),
                reason: format!("validator #{} is not active", id),
            },
            other => LedgerError::Registry(other),
        }
    }
}
