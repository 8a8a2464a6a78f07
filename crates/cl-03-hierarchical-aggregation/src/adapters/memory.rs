use shared_types::{AppendLog, MemoryAppendLog, StoreError};

use crate::domain::aggregate::Aggregate;
use crate::domain::level::Level;
use crate::ports::outbound::AggregateStore;

#[derive(Default)]
pub struct InMemoryAggregateStore {
    levels: [MemoryAppendLog<Aggregate>; 4],
}

impl InMemoryAggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next append at `level` fail.
    pub fn fail_next_append(&mut self, level: Level) {
        self.levels[level.index()].fail_next_append();
    }
}

impl AggregateStore for InMemoryAggregateStore {
    fn load_level(&self, level: Level) -> Result<Vec<Aggregate>, StoreError> {
        self.levels[level.index()].read_all()
    }

    fn append(&mut self, aggregate: &Aggregate) -> Result<(), StoreError> {
        self.levels[aggregate.level.index()].append(aggregate)
    }
}
