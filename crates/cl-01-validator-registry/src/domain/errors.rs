//! # Domain Errors

use shared_types::{StoreError, Timestamp};
use thiserror::Error;

use super::validator::ValidatorId;

/// Errors raised by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The identity already belongs to a registered validator.
    #[error("Validator already registered: {identity} (#{existing})")]
    DuplicateValidator { identity: String, existing: ValidatorId },

    /// No validator with this id.
    #[error("Unknown validator #{0}")]
    UnknownValidator(ValidatorId),

    /// No validator with this identity.
    #[error("Unknown validator identity: {0}")]
    UnknownIdentity(String),

    /// The validator exists but is not active.
    #[error("Validator #{id} ({identity}) is not active")]
    InactiveValidator { id: ValidatorId, identity: String },

    /// Rejected input (empty identity or tag).
    #[error("Invalid validator: {0}")]
    InvalidValidator(String),

    /// Slot `#0` is taken by someone other than the requested founder.
    #[error("Founder slot already held by {existing}")]
    FounderConflict { existing: String },

    /// A history event would be recorded at or before an existing one.
    #[error("Validator #{id}: event at {at} is not after its last event at {last}")]
    HistoryRegression {
        id: ValidatorId,
        last: Timestamp,
        at: Timestamp,
    },

    /// The store refused the write; the registry is unchanged.
    #[error("Registry persistence failed: {0}")]
    Persistence(#[from] StoreError),
}
