//! # Ledger Configuration

/// Default payload ceiling: 1 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Default ceiling for action types and identities.
pub const DEFAULT_MAX_LABEL_BYTES: usize = 256;

/// Admission limits for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Largest accepted payload in bytes (default: 1 MiB).
    pub max_payload_bytes: usize,

    /// Largest accepted action type or identity in bytes (default: 256).
    pub max_label_bytes: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_label_bytes: DEFAULT_MAX_LABEL_BYTES,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload ceiling.
    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Set the label ceiling.
    pub fn with_max_label_bytes(mut self, bytes: usize) -> Self {
        self.max_label_bytes = bytes;
        self
    }
}
