//! Verification findings and the report that carries them.

pub mod errors;
pub mod report;
pub mod violation;
