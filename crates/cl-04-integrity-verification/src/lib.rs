//! # Integrity Verification (cl-04)
//!
//! Re-derives everything the ledger promises and reports where reality
//! differs.
//!
//! ## Page Checks
//!
//! Run in this order; the first failure is the page's one violation.
//!
//! | # | Check |
//! |---|-------|
//! | 1 | Stored `sequence_index` equals position |
//! | 2 | `page_hash` recomputes |
//! | 3 | `prior_hash` equals the predecessor's stored `page_hash` |
//! | 4 | Genesis seal exactly at index 0 |
//! | 5 | Timestamp strictly after predecessor |
//! | 6 | Genesis payload decodes / signer known and active at timestamp |
//! | 7 | Ed25519 signature under the key in force at timestamp |
//!
//! Links are checked against *stored* hashes, so a single tampered page
//! yields exactly one violation instead of a cascade.
//!
//! ## Aggregate Checks
//!
//! Position, rollup hash, prior rollup link, child range, child digests
//! against the stored digests of the level below.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::{CheckpointId, IntegrityError};
pub use domain::report::IntegrityReport;
pub use domain::violation::{Violation, ViolationKind, ViolationScope};
pub use ports::inbound::IntegrityVerificationApi;
pub use service::IntegrityVerifier;
