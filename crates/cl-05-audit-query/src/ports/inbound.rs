//! # Inbound Ports (Driving Ports)

use cl_02_page_ledger::Page;
use shared_types::TimeRange;
use std::collections::BTreeMap;

use crate::domain::filter::AuditFilter;

/// Audit Query API.
///
/// Every method answers from a single snapshot and returns pages in
/// `sequence_index` order.
pub trait AuditQueryApi: Send + Sync {
    /// Pages matching every criterion in `filter`.
    fn find(&self, filter: &AuditFilter) -> Vec<Page>;

    /// Pages submitted by `identity`.
    fn find_by_actor(&self, identity: &str) -> Vec<Page> {
        self.find(&AuditFilter::new().by_actor(identity))
    }

    /// Pages tagged `action_type` with a timestamp inside `range`.
    fn find_by_action_type(&self, action_type: &str, range: TimeRange) -> Vec<Page> {
        self.find(
            &AuditFilter::new()
                .with_action_type(action_type)
                .within(range),
        )
    }

    /// Pages co-signed by validator `identity`.
    fn find_by_signer(&self, identity: &str) -> Vec<Page> {
        self.find(&AuditFilter::new().by_signer(identity))
    }

    fn count(&self, filter: &AuditFilter) -> u64;

    /// Whether `identity` submitted an `action_type` record inside `range`.
    fn has_record(&self, identity: &str, action_type: &str, range: TimeRange) -> bool;

    /// Newest page matching `filter`.
    fn last_matching(&self, filter: &AuditFilter) -> Option<Page>;

    /// Records per action type inside `range`.
    fn action_counts(&self, range: TimeRange) -> BTreeMap<String, u64>;

    fn page(&self, index: u64) -> Option<Page>;
}
