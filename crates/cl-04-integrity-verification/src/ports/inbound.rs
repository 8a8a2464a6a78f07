//! # Inbound Ports (Driving Ports)

use crate::domain::errors::{CheckpointId, IntegrityError};
use crate::domain::report::IntegrityReport;

/// Integrity Verification API.
///
/// Verification never aborts on a finding: every violation is enumerated.
pub trait IntegrityVerificationApi: Send + Sync {
    /// Walk every page and every aggregate.
    fn verify_full(&self) -> IntegrityReport;

    /// Trust `checkpoint` and everything it covers; verify what follows.
    ///
    /// # Errors
    ///
    /// `UnknownCheckpoint` if no such aggregate exists.
    fn verify_from_checkpoint(
        &self,
        checkpoint: CheckpointId,
    ) -> Result<IntegrityReport, IntegrityError>;
}
