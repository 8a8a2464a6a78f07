//! # Ledger Container
//!
//! Opens every subsystem over one data directory, in dependency order:
//! page store (takes the directory lock), registry, ledger, aggregator.
//! Each of them lifts the shared clock past the newest timestamp it loads.

use anyhow::{Context, Result};
use cl_01_validator_registry::ValidatorRegistry;
use cl_02_page_ledger::{FilePageStore, LedgerService};
use cl_03_hierarchical_aggregation::AggregationService;
use cl_04_integrity_verification::IntegrityVerifier;
use cl_05_audit_query::AuditQueryService;
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::info;

use crate::config::AdminConfig;

pub struct LedgerContainer {
    pub registry: Arc<ValidatorRegistry>,
    pub ledger: Arc<LedgerService>,
    pub aggregator: Arc<AggregationService>,
}

impl LedgerContainer {
    pub fn open(config: &AdminConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemTimeSource::new()))
    }

    pub fn open_with_clock(config: &AdminConfig, clock: Arc<dyn TimeSource>) -> Result<Self> {
        let dir = &config.data_dir;

        // The lock is held by the page store for the container's lifetime.
        let pages = FilePageStore::open(dir)
            .with_context(|| format!("Failed to open page log in {}", dir.display()))?;
        let registry = Arc::new(
            ValidatorRegistry::open_dir(dir, Arc::clone(&clock))
                .context("Failed to open validator registry")?,
        );
        let ledger = Arc::new(
            LedgerService::new(Box::new(pages), Arc::clone(&registry), config.ledger.clone())
                .context("Failed to open ledger")?,
        );
        let aggregator = Arc::new(
            AggregationService::open_dir(
                dir,
                ledger.clone(),
                config.aggregation.clone(),
                clock,
            )
            .context("Failed to open aggregate logs")?,
        );

        info!("[admin] 📂 Opened ledger at {}", dir.display());
        Ok(Self {
            registry,
            ledger,
            aggregator,
        })
    }

    pub fn verifier(&self) -> IntegrityVerifier {
        IntegrityVerifier::new(self.ledger.clone(), self.registry.clone())
            .with_aggregates(self.aggregator.clone())
    }

    pub fn audit(&self) -> AuditQueryService {
        AuditQueryService::new(self.ledger.clone())
    }
}
