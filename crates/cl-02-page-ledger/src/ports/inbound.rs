//! # Inbound Ports (Driving Ports)
//!
//! The write and read surface of the ledger.

use shared_crypto::PrivateKey;

use crate::domain::errors::LedgerError;
use crate::domain::genesis::{GenesisParams, GenesisRecord};
use crate::domain::page::{Page, Payload};
use crate::domain::snapshot::LedgerSnapshot;

/// Page Ledger API.
pub trait PageLedgerApi: Send + Sync {
    /// Create page 0 and enroll the founder as validator `#0`.
    ///
    /// # Errors
    ///
    /// - `GenesisAlreadyExists` if the ledger is not empty
    /// - `InvalidGenesis` if `params` fail validation
    fn create_genesis(&self, params: GenesisParams) -> Result<Page, LedgerError>;

    /// Admit a record co-signed by `signer_identity`.
    ///
    /// # Errors
    ///
    /// - `LedgerNotInitialized` before genesis
    /// - `UnauthorizedSigner` if the signer is unknown or inactive now
    /// - `KeyMismatch` if `signing_key` is not the signer's registered key
    /// - `InvalidRecord`, `Signing`, `Persistence`
    fn submit(
        &self,
        action_type: &str,
        payload: Payload,
        submitter_identity: &str,
        signer_identity: &str,
        signing_key: &PrivateKey,
    ) -> Result<Page, LedgerError>;

    /// Number of committed pages.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page at `index`.
    fn page(&self, index: u64) -> Option<Page>;

    /// Newest page.
    fn latest(&self) -> Option<Page>;

    /// Immutable view of every committed page.
    fn snapshot(&self) -> LedgerSnapshot;

    /// Founding parameters decoded from page 0.
    fn genesis_record(&self) -> Result<Option<GenesisRecord>, LedgerError>;
}
