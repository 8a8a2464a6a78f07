//! # Civic-Ledger Test Suite
//!
//! Scenarios that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── end_to_end.rs    # submit → deactivate → verify
//!     ├── persistence.rs   # restart, on-disk tamper, directory lock
//!     ├── concurrency.rs   # many writers, readers and an aggregator
//!     └── aggregation.rs   # roll-up idempotence and checkpoints
//!
//! benches/
//! └── ledger_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cl-tests
//! cargo test -p cl-tests integration::persistence::
//! cargo bench -p cl-tests
//! ```

pub mod integration;
