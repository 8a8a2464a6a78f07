//! # Core Value Types
//!
//! Defines the primitive values shared by the ledger subsystems.

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Microseconds since the Unix epoch (UTC).
///
/// Microsecond resolution keeps registry mutations and page admissions on
/// distinct instants even when they happen back to back.
pub type Timestamp = u64;

/// Sentinel hash used as `prior_hash` of the genesis page and as the
/// `prior_rollup_hash` of the first aggregate at every level.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Render the first 8 bytes of a hash as hex, for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}

/// Render a full hash as hex.
pub fn full_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Half-open time window `[start, end)`.
///
/// A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub start: Option<Timestamp>,
    /// Exclusive upper bound.
    pub end: Option<Timestamp>,
}

impl TimeRange {
    /// A range covering all time.
    pub fn all() -> Self {
        Self::default()
    }

    /// Range `[start, end)`.
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Range `[start, ∞)`.
    pub fn since(start: Timestamp) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Range `(-∞, end)`.
    pub fn until(end: Timestamp) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Check whether `ts` falls inside the range.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts < e)
    }
}
