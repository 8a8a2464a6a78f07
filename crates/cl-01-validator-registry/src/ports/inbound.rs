//! # Inbound Ports (Driving Ports)
//!
//! API offered to the ledger, the verifier and governance tooling.

use shared_crypto::PublicKey;
use shared_types::Timestamp;

use crate::domain::errors::RegistryError;
use crate::domain::validator::{Authorization, Validator, ValidatorId};

/// Validator Registry API.
pub trait ValidatorRegistryApi: Send + Sync {
    /// Register a new, active validator.
    ///
    /// # Errors
    ///
    /// - `DuplicateValidator` if the identity is taken
    /// - `InvalidValidator` for an empty identity or tag
    /// - `Persistence` if the store refused the write
    fn register_validator(
        &self,
        identity: &str,
        public_key: PublicKey,
        authority_tag: &str,
    ) -> Result<ValidatorId, RegistryError>;

    /// Mark a validator active. No-op if it already is.
    fn activate(&self, id: ValidatorId) -> Result<(), RegistryError>;

    /// Mark a validator inactive. No-op if it already is.
    fn deactivate(&self, id: ValidatorId) -> Result<(), RegistryError>;

    /// Whether `id` was active at instant `at`. Unknown ids are never active.
    fn is_active(&self, id: ValidatorId, at: Timestamp) -> bool;

    /// Current public key.
    fn get_public_key(&self, id: ValidatorId) -> Result<PublicKey, RegistryError>;

    /// Key that was in force at `at`.
    fn public_key_at(&self, id: ValidatorId, at: Timestamp) -> Option<PublicKey>;

    /// Replace a validator's key from now on. Earlier pages keep verifying.
    fn rotate_public_key(&self, id: ValidatorId, public_key: PublicKey)
        -> Result<(), RegistryError>;

    /// Id registered for an identity.
    fn lookup(&self, identity: &str) -> Option<ValidatorId>;

    /// Snapshot of a validator.
    fn get(&self, id: ValidatorId) -> Option<Validator>;

    /// Validators active at `at`, in id order.
    fn active_validators(&self, at: Timestamp) -> Vec<Validator>;

    /// Check that `identity` is active *now* and report the instant and key.
    ///
    /// # Errors
    ///
    /// - `UnknownIdentity` if nobody holds that identity
    /// - `InactiveValidator` if the validator is deactivated
    fn authorize(&self, identity: &str) -> Result<Authorization, RegistryError>;
}
