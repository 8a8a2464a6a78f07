//! # Domain Errors

use shared_types::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregationError {
    /// A threshold of zero or otherwise unusable configuration.
    #[error("Invalid aggregation config: {0}")]
    InvalidConfig(String),

    /// The aggregate store refused the write; nothing was closed.
    #[error("Aggregate persistence failed: {0}")]
    Persistence(#[from] StoreError),
}
