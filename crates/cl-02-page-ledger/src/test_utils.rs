use cl_01_validator_registry::{ValidatorId, ValidatorRegistry, ValidatorRegistryApi};
use shared_crypto::{KeyPair, PrivateKey};
use shared_types::ManualTimeSource;
use std::sync::Arc;

use crate::adapters::{FailureSwitch, InMemoryPageStore};
use crate::domain::config::LedgerConfig;
use crate::domain::errors::LedgerError;
use crate::domain::genesis::GenesisParams;
use crate::domain::page::{Page, Payload};
use crate::ports::inbound::PageLedgerApi;
use crate::service::LedgerService;

pub const FOUNDER: &str = "founder@civic.example";

/// Clock start for fixtures: 2024-01-01T00:00:00Z in microseconds.
pub const T0: u64 = 1_704_067_200_000_000;

/// Deterministic key pair derived from `seed`.
pub fn keypair(seed: u8) -> KeyPair {
    KeyPair::from_private(PrivateKey::from_seed([seed; 32]))
}

pub fn founder_keypair() -> KeyPair {
    keypair(0xF0)
}

/// In-memory ledger wired to a manual clock and registry.
pub struct TestLedger {
    pub clock: Arc<ManualTimeSource>,
    pub registry: Arc<ValidatorRegistry>,
    pub ledger: Arc<LedgerService>,
    pub founder: KeyPair,
    pub failures: FailureSwitch,
}

impl TestLedger {
    /// Ledger without a genesis page.
    pub fn uninitialized() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(T0));
        let registry = Arc::new(ValidatorRegistry::in_memory(clock.clone()));
        let store = InMemoryPageStore::new();
        let failures = store.failure_switch();
        let ledger = LedgerService::new(Box::new(store), Arc::clone(&registry), config)
            .expect("in-memory ledger opens");

        Self {
            clock,
            registry,
            ledger: Arc::new(ledger),
            founder: founder_keypair(),
            failures,
        }
    }

    /// Ledger with genesis already created by `FOUNDER`.
    pub fn new() -> Self {
        let fixture = Self::uninitialized();
        fixture
            .ledger
            .create_genesis(GenesisParams::new(FOUNDER, fixture.founder.public_key()))
            .expect("genesis");
        fixture
    }

    /// Genesis plus `count` founder-signed pages.
    pub fn with_pages(count: usize) -> Self {
        let fixture = Self::new();
        for i in 0..count {
            fixture.submit_founder("vote_cast", &format!("citizen-{}", i % 5));
        }
        fixture
    }

    /// Register an active validator with tag `clerk`.
    pub fn add_validator(&self, identity: &str, seed: u8) -> (ValidatorId, KeyPair) {
        let keys = keypair(seed);
        let id = self
            .registry
            .register_validator(identity, keys.public_key(), "clerk")
            .expect("register validator");
        (id, keys)
    }

    pub fn submit(
        &self,
        action_type: &str,
        submitter: &str,
        signer: &str,
        keys: &KeyPair,
    ) -> Result<Page, LedgerError> {
        let payload = Payload::from_json(&serde_json::json!({
            "action": action_type,
            "submitter": submitter,
        }))
        .expect("json payload");
        self.ledger
            .submit(action_type, payload, submitter, signer, keys.private_key())
    }

    pub fn submit_founder(&self, action_type: &str, submitter: &str) -> Page {
        self.submit(action_type, submitter, FOUNDER, &self.founder)
            .expect("founder submit")
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}
