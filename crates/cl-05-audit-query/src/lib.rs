//! # Audit Query (cl-05)
//!
//! The read-only face of the ledger. Governance logic that lives outside the
//! core (term limits, role audits, transaction logs) asks its questions here
//! and writes only through `PageLedgerApi::submit`.
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | Ordered results | Pages are scanned in `sequence_index` order |
//! | Consistent view | Each query runs over one ledger snapshot |
//! | No mutation | Only `PageLedgerApi` read methods are called |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - `AuditFilter`
//! - `ports/` - `AuditQueryApi` (inbound)
//! - `service/` - `AuditQueryService`
//!
//! ## Usage
//!
//! ```ignore
//! let audit = AuditQueryService::new(ledger.clone());
//! let votes = audit.find_by_action_type("vote_cast", TimeRange::since(start));
//! let served = audit.count(&AuditFilter::new().by_actor("alice").with_action_type("term_started"));
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::filter::AuditFilter;
pub use ports::inbound::AuditQueryApi;
pub use service::AuditQueryService;
pub use shared_types::TimeRange;
