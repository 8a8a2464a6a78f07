//! # Outbound Ports (Driven Ports)
//!
//! Production: `JsonFileValidatorStore`
//! Testing: `InMemoryValidatorStore`

use shared_types::StoreError;

use crate::domain::state::RegistryState;

/// Persistence for the registry.
///
/// The registry is small and rewritten whole on every mutation.
pub trait ValidatorStore: Send + Sync {
    /// Load the stored state, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<RegistryState>, StoreError>;

    /// Replace the stored state atomically.
    fn save(&mut self, state: &RegistryState) -> Result<(), StoreError>;
}
