//! Result of a verification run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::violation::{Violation, ViolationScope};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub pages_checked: u64,
    pub aggregates_checked: u64,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// `(is_valid, violations)`
    pub fn into_parts(self) -> (bool, Vec<Violation>) {
        (self.violations.is_empty(), self.violations)
    }

    /// Violations found on pages only.
    pub fn page_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.scope == ViolationScope::Page)
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages and {} aggregates checked, {} violations",
            self.pages_checked,
            self.aggregates_checked,
            self.violations.len()
        )
    }
}
