//! Page selection criteria.

use cl_02_page_ledger::Page;
use serde::{Deserialize, Serialize};
use shared_types::{TimeRange, Timestamp};

/// Conjunction of optional criteria. The default filter matches every page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Submitter identity.
    pub actor: Option<String>,
    /// Signing validator identity.
    pub signer: Option<String>,
    pub action_type: Option<String>,
    #[serde(default)]
    pub range: TimeRange,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_actor(mut self, identity: impl Into<String>) -> Self {
        self.actor = Some(identity.into());
        self
    }

    pub fn by_signer(mut self, identity: impl Into<String>) -> Self {
        self.signer = Some(identity.into());
        self
    }

    pub fn with_action_type(mut self, tag: impl Into<String>) -> Self {
        self.action_type = Some(tag.into());
        self
    }

    pub fn within(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn since(self, start: Timestamp) -> Self {
        let end = self.range.end;
        self.within(TimeRange {
            start: Some(start),
            end,
        })
    }

    pub fn until(self, end: Timestamp) -> Self {
        let start = self.range.start;
        self.within(TimeRange {
            start,
            end: Some(end),
        })
    }

    pub fn matches(&self, page: &Page) -> bool {
        fn field_ok(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }

        field_ok(&self.actor, &page.submitter_identity)
            && field_ok(&self.signer, &page.signer_identity)
            && field_ok(&self.action_type, &page.action_type)
            && self.range.contains(page.timestamp)
    }
}
