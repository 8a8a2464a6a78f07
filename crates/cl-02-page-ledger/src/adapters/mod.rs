//! Adapters implementing `PageStore`.

pub mod file;
pub mod memory;

pub use file::{FilePageStore, PAGES_FILE};
pub use memory::{FailureSwitch, InMemoryPageStore};
