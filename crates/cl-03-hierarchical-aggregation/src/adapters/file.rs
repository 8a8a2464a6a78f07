//! One framed log per level: `chapters.log`, `books.log`, `parts.log`, `series.log`.
//!
//! Lives next to `pages.log`; the ledger's page store holds the directory lock.

use shared_types::{AppendLog, FileAppendLog, StoreError};
use std::path::Path;

use crate::domain::aggregate::Aggregate;
use crate::domain::level::Level;
use crate::ports::outbound::AggregateStore;

pub struct FileAggregateStore {
    levels: [FileAppendLog<Aggregate>; 4],
}

impl FileAggregateStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let open = |level: Level| FileAppendLog::open(data_dir.join(level.file_name()));
        Ok(Self {
            levels: [
                open(Level::Chapter)?,
                open(Level::Book)?,
                open(Level::Part)?,
                open(Level::Series)?,
            ],
        })
    }
}

impl AggregateStore for FileAggregateStore {
    fn load_level(&self, level: Level) -> Result<Vec<Aggregate>, StoreError> {
        self.levels[level.index()].read_all()
    }

    fn append(&mut self, aggregate: &Aggregate) -> Result<(), StoreError> {
        self.levels[aggregate.level.index()].append(aggregate)
    }
}
