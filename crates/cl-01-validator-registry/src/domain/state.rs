//! Registry state: the ordered validator list plus an identity lookup.

use serde::{Deserialize, Serialize};
use shared_crypto::PublicKey;
use shared_types::Timestamp;
use std::collections::HashMap;

use super::errors::RegistryError;
use super::validator::{Validator, ValidatorId};

/// Complete registry contents. This is the unit persisted by a `ValidatorStore`.
///
/// `validators[i].id == i` always holds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryState {
    pub validators: Vec<Validator>,
    /// Quick lookup by identity
    #[serde(skip)]
    by_identity: HashMap<String, ValidatorId>,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check structural invariants and rebuild the lookup (after deserialization).
    pub fn validated(mut self) -> Result<Self, RegistryError> {
        for (position, validator) in self.validators.iter().enumerate() {
            if validator.id != position as ValidatorId {
                return Err(RegistryError::InvalidValidator(format!(
                    "validator at position {} has id #{}",
                    position, validator.id
                )));
            }
            validator.check_history()?;
        }
        self.rebuild_lookup();
        if self.by_identity.len() != self.validators.len() {
            return Err(RegistryError::InvalidValidator(
                "duplicate identity in stored registry".to_string(),
            ));
        }
        Ok(self)
    }

    /// Newest instant recorded anywhere in the registry, zero when empty.
    pub fn last_event_at(&self) -> Timestamp {
        self.validators
            .iter()
            .map(Validator::last_event_at)
            .max()
            .unwrap_or(0)
    }

    /// Rebuild the lookup table
    pub fn rebuild_lookup(&mut self) {
        self.by_identity = self
            .validators
            .iter()
            .map(|v| (v.identity.clone(), v.id))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn get(&self, id: ValidatorId) -> Option<&Validator> {
        usize::try_from(id).ok().and_then(|i| self.validators.get(i))
    }

    pub fn get_mut(&mut self, id: ValidatorId) -> Option<&mut Validator> {
        usize::try_from(id)
            .ok()
            .and_then(move |i| self.validators.get_mut(i))
    }

    pub fn lookup(&self, identity: &str) -> Option<ValidatorId> {
        self.by_identity.get(identity).copied()
    }

    pub fn by_identity(&self, identity: &str) -> Option<&Validator> {
        self.lookup(identity).and_then(|id| self.get(id))
    }

    /// Append a new active validator and return its id.
    pub fn insert(
        &mut self,
        identity: &str,
        public_key: PublicKey,
        authority_tag: &str,
        at: Timestamp,
    ) -> Result<ValidatorId, RegistryError> {
        if identity.trim().is_empty() {
            return Err(RegistryError::InvalidValidator(
                "identity must not be empty".to_string(),
            ));
        }
        if authority_tag.trim().is_empty() {
            return Err(RegistryError::InvalidValidator(
                "authority tag must not be empty".to_string(),
            ));
        }
        if let Some(existing) = self.lookup(identity) {
            return Err(RegistryError::DuplicateValidator {
                identity: identity.to_string(),
                existing,
            });
        }

        let id = self.validators.len() as ValidatorId;
        self.validators
            .push(Validator::new(id, identity, public_key, authority_tag, at));
        self.by_identity.insert(identity.to_string(), id);
        Ok(id)
    }
}
