//! # Aggregates
//!
//! A closed chapter, book, part or series.
//!
//! ```text
//! rollup_hash = SHA-256(
//!     "civic-ledger/rollup/v1"
//!     level depth        u8
//!     position           u64 LE
//!     first_child        u64 LE
//!     first_page         u64 LE
//!     last_page          u64 LE
//!     prior_rollup_hash  32 bytes
//!     child_count        u32 LE
//!     child digests      32 bytes each
//! )
//! ```

use serde::{Deserialize, Serialize};
use shared_crypto::Sha256Hasher;
use shared_types::{short_hex, Hash, Timestamp};

use super::level::Level;

/// Domain separation tag of rollup hashes.
pub const ROLLUP_DOMAIN_TAG: &[u8] = b"civic-ledger/rollup/v1";

/// Address of an aggregate within the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateId {
    pub level: Level,
    pub position: u64,
}

impl AggregateId {
    pub fn new(level: Level, position: u64) -> Self {
        Self { level, position }
    }
}

impl std::fmt::Display for AggregateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level, self.position)
    }
}

/// A closed, immutable aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub level: Level,
    /// Index within its level.
    pub position: u64,
    /// Index of the first child in the level below (page index for chapters).
    pub first_child: u64,
    /// First covered page index.
    pub first_page: u64,
    /// Last covered page index (inclusive).
    pub last_page: u64,
    /// Page hashes (chapters) or rollup hashes (higher levels), in order.
    pub child_digests: Vec<Hash>,
    pub rollup_hash: Hash,
    /// Rollup hash of the previous aggregate at this level, zero for the first.
    pub prior_rollup_hash: Hash,
    pub closed_at: Timestamp,
}

impl Aggregate {
    pub fn id(&self) -> AggregateId {
        AggregateId::new(self.level, self.position)
    }

    pub fn child_count(&self) -> u64 {
        self.child_digests.len() as u64
    }

    /// Index one past the last child.
    pub fn next_child(&self) -> u64 {
        self.first_child.saturating_add(self.child_count())
    }

    /// Recompute the rollup hash from the stored fields.
    pub fn compute_hash(&self) -> Hash {
        compute_rollup_hash(
            self.level,
            self.position,
            self.first_child,
            self.first_page,
            self.last_page,
            &self.prior_rollup_hash,
            &self.child_digests,
        )
    }

    pub fn short_hash(&self) -> String {
        short_hex(&self.rollup_hash)
    }
}

pub fn compute_rollup_hash(
    level: Level,
    position: u64,
    first_child: u64,
    first_page: u64,
    last_page: u64,
    prior_rollup_hash: &Hash,
    child_digests: &[Hash],
) -> Hash {
    let mut hasher = Sha256Hasher::new();
    hasher
        .update(ROLLUP_DOMAIN_TAG)
        .update(&[level.depth()])
        .update(&position.to_le_bytes())
        .update(&first_child.to_le_bytes())
        .update(&first_page.to_le_bytes())
        .update(&last_page.to_le_bytes())
        .update(prior_rollup_hash)
        .update(&(child_digests.len() as u32).to_le_bytes());
    for digest in child_digests {
        hasher.update(digest);
    }
    hasher.finalize()
}
