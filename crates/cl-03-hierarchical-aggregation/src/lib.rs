//! # Hierarchical Aggregation (cl-03)
//!
//! Folds pages into chapters, chapters into books, books into parts and
//! parts into series. Every aggregate commits to its children's digests and
//! to the previous aggregate at its level.
//!
//! ```text
//! pages    p0 p1 .. p15 | p16 .. p31 | ...
//! chapter  [    c0     ] [    c1    ] ...   16 pages each (default)
//! book     [          b0 = c0..c15         ] ...
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - `Level`, `Aggregate`, `AggregationConfig`, errors
//! - `ports/` - `HierarchicalAggregationApi` (inbound), `AggregateStore` (outbound)
//! - `adapters/` - In-memory and framed-file aggregate stores
//! - `service/` - `AggregationService`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileAggregateStore, InMemoryAggregateStore};
pub use domain::aggregate::{compute_rollup_hash, Aggregate, AggregateId, ROLLUP_DOMAIN_TAG};
pub use domain::config::{AggregationConfig, DEFAULT_THRESHOLD};
pub use domain::errors::AggregationError;
pub use domain::level::Level;
pub use ports::inbound::HierarchicalAggregationApi;
pub use ports::outbound::AggregateStore;
pub use service::AggregationService;
