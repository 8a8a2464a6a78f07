//! # Page Ledger (cl-02)
//!
//! Append-only store of signed pages, plus the genesis bootstrap.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Chain continuity | `page[i].prior_hash == page[i-1].page_hash`, zero for genesis |
//! | Dense indices | `sequence_index` is the page's position, no gaps, no repeats |
//! | Authority | Every non-genesis page is signed by a validator active at its timestamp |
//! | Unique genesis | Exactly one page carries the genesis seal, at index 0 |
//! | Atomic admission | A failed `submit` changes nothing |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pages, canonical encoding, genesis parameters, config, errors
//! - `ports/` - `PageLedgerApi` (inbound), `PageStore` (outbound)
//! - `adapters/` - In-memory and framed-file page stores
//! - `service/` - `LedgerService`
//!
//! ## Usage
//!
//! ```ignore
//! use cl_02_page_ledger::{GenesisParams, LedgerService, PageLedgerApi, Payload};
//!
//! let ledger = LedgerService::in_memory(registry);
//! ledger.create_genesis(GenesisParams::new("founder", founder.public_key()))?;
//! let page = ledger.submit(
//!     "user_registration",
//!     Payload::from_json(&form)?,
//!     "citizen-42",
//!     "founder",
//!     founder.private_key(),
//! )?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Shared fixtures for this crate's tests and downstream test suites.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{FailureSwitch, FilePageStore, InMemoryPageStore, PAGES_FILE};
pub use domain::config::LedgerConfig;
pub use domain::errors::LedgerError;
pub use domain::genesis::{ConstitutionalParams, GenesisParams, GenesisRecord, NetworkParams};
pub use domain::page::{
    compute_page_hash, Page, PageDraft, PageSeal, Payload, GENESIS_ACTION, GENESIS_SEAL,
    PAGE_DOMAIN_TAG,
};
pub use domain::snapshot::LedgerSnapshot;
pub use ports::inbound::PageLedgerApi;
pub use ports::outbound::PageStore;
pub use service::LedgerService;
