//! # Validator Registry (cl-01)
//!
//! Maintains the set of entities authorized to co-sign ledger pages.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Unique identity | One validator per identity string |
//! | Sequential ids | Ids are assigned 0, 1, 2, ...; the founder is `#0` |
//! | Append-only history | Activation and key changes are recorded, never rewritten |
//! | Stable answers | `is_active(id, t)` never changes once `t` has passed |
//! | All-or-nothing writes | A mutation that fails to persist leaves no trace |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Validator entity, registry state, errors
//! - `ports/` - `ValidatorRegistryApi` (inbound), `ValidatorStore` (outbound)
//! - `adapters/` - In-memory and JSON-file stores
//! - `service.rs` - `ValidatorRegistry`, the thread-safe service
//!
//! ## Usage
//!
//! ```ignore
//! use cl_01_validator_registry::{ValidatorRegistry, ValidatorRegistryApi};
//!
//! let registry = ValidatorRegistry::in_memory(clock);
//! let id = registry.register_validator("clerk@county", key, "clerk")?;
//! let grant = registry.authorize("clerk@county")?;
//! assert!(registry.is_active(id, grant.at));
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryValidatorStore, JsonFileValidatorStore};
pub use domain::errors::RegistryError;
pub use domain::state::RegistryState;
pub use domain::validator::{
    Authorization, KeyEpoch, StatusChange, StatusEvent, Validator, ValidatorId, FOUNDER_ID,
    FOUNDER_TAG,
};
pub use ports::inbound::ValidatorRegistryApi;
pub use ports::outbound::ValidatorStore;
pub use service::ValidatorRegistry;
