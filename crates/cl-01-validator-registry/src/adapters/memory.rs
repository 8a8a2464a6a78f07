//! In-memory registry store.

use shared_types::StoreError;

use crate::domain::state::RegistryState;
use crate::ports::outbound::ValidatorStore;

/// Keeps the last saved state in memory.
#[derive(Debug, Default)]
pub struct InMemoryValidatorStore {
    state: Option<RegistryState>,
    fail_next: bool,
}

impl InMemoryValidatorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save` fail (testing).
    pub fn fail_next_save(&mut self) {
        self.fail_next = true;
    }
}

impl ValidatorStore for InMemoryValidatorStore {
    fn load(&self) -> Result<Option<RegistryState>, StoreError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &RegistryState) -> Result<(), StoreError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(StoreError::Injected("validator store save".to_string()));
        }
        self.state = Some(state.clone());
        Ok(())
    }
}
