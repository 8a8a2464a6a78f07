//! # Outbound Ports (Driven Ports)
//!
//! Production: `FileAggregateStore`
//! Testing: `InMemoryAggregateStore`

use shared_types::StoreError;

use crate::domain::aggregate::Aggregate;
use crate::domain::level::Level;

/// Append-only persistence for closed aggregates, one log per level.
pub trait AggregateStore: Send + Sync {
    fn load_level(&self, level: Level) -> Result<Vec<Aggregate>, StoreError>;

    /// Durably append to `aggregate.level`'s log. On error the store is unchanged.
    fn append(&mut self, aggregate: &Aggregate) -> Result<(), StoreError>;
}
