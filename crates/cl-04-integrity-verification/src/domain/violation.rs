//! A single integrity finding.

use cl_03_hierarchical_aggregation::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What was being checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationScope {
    Page,
    Aggregate(Level),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Stored index or position differs from where the record sits.
    SequenceMismatch,
    /// Recomputed hash differs from the stored one.
    HashMismatch,
    /// `prior_hash` / `prior_rollup_hash` does not match the predecessor.
    BrokenLink,
    /// Genesis seal away from index 0, or a signed seal at index 0.
    MisplacedSeal,
    /// Timestamp not after the predecessor's.
    TimestampRegression,
    /// Genesis payload is not a valid genesis record.
    InvalidGenesisRecord,
    /// Signer identity is not in the registry.
    UnknownSigner,
    /// Signer was not active at the page timestamp.
    InactiveSigner,
    /// Signature does not verify under the signer's key at that time.
    InvalidSignature,
    /// Signature bytes are malformed.
    MalformedSignature,
    /// Aggregate's child digests differ from the stored children.
    ChildMismatch,
    /// Aggregate's child or page range is not where it should be.
    CoverageMismatch,
}

/// One finding. `index` is the page index or aggregate position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub scope: ViolationScope,
    pub index: u64,
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn page(index: u64, kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            scope: ViolationScope::Page,
            index,
            kind,
            detail: detail.into(),
        }
    }

    pub fn aggregate(
        level: Level,
        position: u64,
        kind: ViolationKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            scope: ViolationScope::Aggregate(level),
            index: position,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            ViolationScope::Page => write!(f, "page {}", self.index)?,
            ViolationScope::Aggregate(level) => write!(f, "{} {}", level, self.index)?,
        }
        write!(f, ": {:?}: {}", self.kind, self.detail)
    }
}
