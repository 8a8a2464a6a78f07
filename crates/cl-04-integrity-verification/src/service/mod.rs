//! # Integrity Verifier
//!
//! Read-only. Takes the aggregate lists before the page snapshot so the
//! pages are always at least as new as what the aggregates cover.

mod aggregates;
mod pages;
#[cfg(test)]
mod tests;

use cl_01_validator_registry::ValidatorRegistryApi;
use cl_02_page_ledger::PageLedgerApi;
use cl_03_hierarchical_aggregation::{Aggregate, HierarchicalAggregationApi, Level};
use shared_types::ZERO_HASH;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{CheckpointId, IntegrityError};
use crate::domain::report::IntegrityReport;
use crate::domain::violation::{Violation, ViolationKind};
use crate::ports::inbound::IntegrityVerificationApi;

pub struct IntegrityVerifier {
    ledger: Arc<dyn PageLedgerApi>,
    registry: Arc<dyn ValidatorRegistryApi>,
    aggregator: Option<Arc<dyn HierarchicalAggregationApi>>,
}

impl IntegrityVerifier {
    /// Verifier over pages only.
    pub fn new(ledger: Arc<dyn PageLedgerApi>, registry: Arc<dyn ValidatorRegistryApi>) -> Self {
        Self {
            ledger,
            registry,
            aggregator: None,
        }
    }

    /// Also verify aggregates, and allow checkpoints.
    pub fn with_aggregates(mut self, aggregator: Arc<dyn HierarchicalAggregationApi>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    fn all_aggregates(&self) -> [Vec<Aggregate>; 4] {
        match &self.aggregator {
            Some(agg) => Level::ALL.map(|level| agg.aggregates(level)),
            None => Default::default(),
        }
    }

    fn finish(report: IntegrityReport) -> IntegrityReport {
        for violation in &report.violations {
            warn!("[cl-04] ❌ {}", violation);
        }
        if report.is_valid() {
            info!("[cl-04] ✅ Ledger intact: {}", report);
        } else {
            warn!("[cl-04] Ledger integrity violated: {}", report);
        }
        report
    }
}

impl IntegrityVerificationApi for IntegrityVerifier {
    fn verify_full(&self) -> IntegrityReport {
        let levels = self.all_aggregates();
        let snapshot = self.ledger.snapshot();

        let mut report = IntegrityReport::default();
        self.check_pages(&snapshot, 0, ZERO_HASH, None, &mut report);
        aggregates::check_all(&levels, &snapshot, |_| true, &mut report);
        Self::finish(report)
    }

    fn verify_from_checkpoint(
        &self,
        checkpoint: CheckpointId,
    ) -> Result<IntegrityReport, IntegrityError> {
        let aggregator = self
            .aggregator
            .as_ref()
            .ok_or(IntegrityError::UnknownCheckpoint(checkpoint))?;
        let anchor = aggregator
            .get(checkpoint.level, checkpoint.position)
            .ok_or(IntegrityError::UnknownCheckpoint(checkpoint))?;
        let levels = self.all_aggregates();
        let snapshot = self.ledger.snapshot();

        let mut report = IntegrityReport::default();
        report.aggregates_checked += 1;
        let recomputed = anchor.compute_hash();
        if recomputed != anchor.rollup_hash {
            report.violations.push(Violation::aggregate(
                anchor.level,
                anchor.position,
                ViolationKind::HashMismatch,
                "checkpoint rollup hash does not recompute",
            ));
        }

        let Some(last_covered) = usize::try_from(anchor.last_page)
            .ok()
            .and_then(|i| snapshot.get(i))
        else {
            report.violations.push(Violation::aggregate(
                anchor.level,
                anchor.position,
                ViolationKind::CoverageMismatch,
                format!(
                    "checkpoint covers page {} but the ledger has {} pages",
                    anchor.last_page,
                    snapshot.len()
                ),
            ));
            return Ok(Self::finish(report));
        };

        let start = anchor.last_page + 1;
        self.check_pages(
            &snapshot[start as usize..],
            start,
            last_covered.page_hash,
            Some(last_covered.timestamp),
            &mut report,
        );
        aggregates::check_all(
            &levels,
            &snapshot,
            |agg| agg.last_page > anchor.last_page,
            &mut report,
        );

        info!("[cl-04] Verified from checkpoint {}", checkpoint);
        Ok(Self::finish(report))
    }
}
