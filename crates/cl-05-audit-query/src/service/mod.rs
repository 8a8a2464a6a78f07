//! # Audit Query Service
//!
//! Scans one `LedgerSnapshot` per call. The snapshot is an `Arc` clone of the
//! committed pages, so queries never hold a ledger lock while they run.


use cl_02_page_ledger::{Page, PageLedgerApi};
use shared_types::TimeRange;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::filter::AuditFilter;
use crate::ports::inbound::AuditQueryApi;

pub struct AuditQueryService {
    ledger: Arc<dyn PageLedgerApi>,
}

impl AuditQueryService {
    pub fn new(ledger: Arc<dyn PageLedgerApi>) -> Self {
        Self { ledger }
    }
}

impl AuditQueryApi for AuditQueryService {
    fn find(&self, filter: &AuditFilter) -> Vec<Page> {
        let snapshot = self.ledger.snapshot();
        let found: Vec<Page> = snapshot
            .iter()
            .filter(|page| filter.matches(page))
            .cloned()
            .collect();
        debug!(
            "[cl-05] {:?} matched {} of {} pages",
            filter,
            found.len(),
            snapshot.len()
        );
        found
    }

    fn count(&self, filter: &AuditFilter) -> u64 {
        self.ledger
            .snapshot()
            .iter()
            .filter(|page| filter.matches(page))
            .count() as u64
    }

    fn has_record(&self, identity: &str, action_type: &str, range: TimeRange) -> bool {
        let filter = AuditFilter::new()
            .by_actor(identity)
            .with_action_type(action_type)
            .within(range);
        self.ledger.snapshot().iter().any(|page| filter.matches(page))
    }

    fn last_matching(&self, filter: &AuditFilter) -> Option<Page> {
        self.ledger
            .snapshot()
            .iter()
            .rev()
            .find(|page| filter.matches(page))
            .cloned()
    }

    fn action_counts(&self, range: TimeRange) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for page in self.ledger.snapshot().iter() {
            if range.contains(page.timestamp) {
                *counts.entry(page.action_type.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn page(&self, index: u64) -> Option<Page> {
        self.ledger.page(index)
    }
}
