//! # Domain Errors
//!
//! Violations are findings, not errors. The only failure is being asked to
//! start from a checkpoint that does not exist.

use cl_03_hierarchical_aggregation::AggregateId;
use thiserror::Error;

/// Identifies the aggregate a partial verification starts from.
pub type CheckpointId = AggregateId;

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Unknown checkpoint: {0}")]
    UnknownCheckpoint(CheckpointId),
}
