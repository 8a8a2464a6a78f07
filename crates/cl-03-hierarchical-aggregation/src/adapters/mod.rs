//! Adapters implementing `AggregateStore`.

mod file;
mod memory;

pub use file::FileAggregateStore;
pub use memory::InMemoryAggregateStore;
