//! # Genesis Parameters
//!
//! The founding configuration embedded in page 0.

use serde::{Deserialize, Serialize};
use shared_crypto::PublicKey;
use std::collections::BTreeMap;

use super::errors::LedgerError;
use super::page::Payload;

/// Version of the `GenesisRecord` JSON layout.
pub const GENESIS_FORMAT_VERSION: u32 = 1;

/// Governance constants fixed at founding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstitutionalParams {
    /// Approval thresholds in percent, keyed by decision kind.
    pub thresholds: BTreeMap<String, u8>,

    /// Human-readable description of the authority hierarchy.
    pub authority_hierarchy: String,
}

impl Default for ConstitutionalParams {
    fn default() -> Self {
        let thresholds = [
            ("constitutional_amendment", 67),
            ("validator_admission", 51),
            ("validator_removal", 51),
        ]
        .into_iter()
        .map(|(kind, pct)| (kind.to_string(), pct))
        .collect();

        Self {
            thresholds,
            authority_hierarchy: "founder > council > clerk".to_string(),
        }
    }
}

/// How the validator network operates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub chain_name: String,
    pub consensus_mode: String,
    pub validator_selection: String,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            chain_name: "civic-ledger".to_string(),
            consensus_mode: "proof_of_authority".to_string(),
            validator_selection: "governance_election".to_string(),
        }
    }
}

/// Input to `create_genesis`.
#[derive(Debug, Clone)]
pub struct GenesisParams {
    pub founder_identity: String,
    pub founder_public_key: PublicKey,
    pub constitutional: ConstitutionalParams,
    pub network: NetworkParams,
}

impl GenesisParams {
    /// Params with default constitution and network settings.
    pub fn new(founder_identity: impl Into<String>, founder_public_key: PublicKey) -> Self {
        Self {
            founder_identity: founder_identity.into(),
            founder_public_key,
            constitutional: ConstitutionalParams::default(),
            network: NetworkParams::default(),
        }
    }

    pub fn with_constitution(mut self, constitutional: ConstitutionalParams) -> Self {
        self.constitutional = constitutional;
        self
    }

    pub fn with_network(mut self, network: NetworkParams) -> Self {
        self.network = network;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.founder_identity.trim().is_empty() {
            return Err(LedgerError::InvalidGenesis(
                "founder identity must not be empty".to_string(),
            ));
        }

        if self.network.chain_name.trim().is_empty() {
            return Err(LedgerError::InvalidGenesis(
                "chain name must not be empty".to_string(),
            ));
        }

        for (kind, pct) in &self.constitutional.thresholds {
            if !(1..=100).contains(pct) {
                return Err(LedgerError::InvalidGenesis(format!(
                    "threshold {} = {}% is outside 1..=100",
                    kind, pct
                )));
            }
        }

        Ok(())
    }
}

/// Payload of page 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    pub format_version: u32,
    pub founder_identity: String,
    pub founder_public_key: PublicKey,
    pub constitutional: ConstitutionalParams,
    pub network: NetworkParams,
}

impl GenesisRecord {
    pub fn from_params(params: &GenesisParams) -> Self {
        Self {
            format_version: GENESIS_FORMAT_VERSION,
            founder_identity: params.founder_identity.clone(),
            founder_public_key: params.founder_public_key,
            constitutional: params.constitutional.clone(),
            network: params.network.clone(),
        }
    }

    pub fn encode(&self) -> Result<Payload, LedgerError> {
        Payload::from_json(self).map_err(|e| LedgerError::InvalidGenesis(e.to_string()))
    }

    /// Read the founding parameters back from a genesis payload.
    pub fn decode(payload: &Payload) -> Result<Self, LedgerError> {
        let record: Self = payload
            .to_json()
            .map_err(|e| LedgerError::InvalidGenesis(e.to_string()))?;
        if record.format_version != GENESIS_FORMAT_VERSION {
            return Err(LedgerError::InvalidGenesis(format!(
                "unsupported genesis format version {}",
                record.format_version
            )));
        }
        Ok(record)
    }
}
