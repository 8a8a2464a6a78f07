//! Adapters implementing `ValidatorStore`.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileValidatorStore;
pub use memory::InMemoryValidatorStore;
