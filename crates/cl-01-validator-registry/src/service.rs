//! # Validator Registry Service
//!
//! Thread-safe registry implementing `ValidatorRegistryApi`.
//!
//! ## Concurrency
//!
//! State lives behind a `parking_lot::RwLock`. Every timestamp the registry
//! hands out or records is read from the clock *while the lock is held*, so
//! `authorize` and `deactivate` are totally ordered: an authorization either
//! precedes a deactivation (and stays valid forever) or follows it (and is
//! refused).
//!
//! ## Persistence
//!
//! Mutations are applied to a copy of the state, saved through the
//! `ValidatorStore`, and only then swapped in.

use parking_lot::RwLock;
use shared_crypto::PublicKey;
use shared_types::{TimeSource, Timestamp};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{InMemoryValidatorStore, JsonFileValidatorStore};
use crate::domain::errors::RegistryError;
use crate::domain::state::RegistryState;
use crate::domain::validator::{Authorization, Validator, ValidatorId, FOUNDER_ID, FOUNDER_TAG};
use crate::ports::inbound::ValidatorRegistryApi;
use crate::ports::outbound::ValidatorStore;

struct RegistryInner {
    state: RegistryState,
    store: Box<dyn ValidatorStore>,
}

/// The Validator Registry.
pub struct ValidatorRegistry {
    inner: RwLock<RegistryInner>,
    time_source: Arc<dyn TimeSource>,
}

impl ValidatorRegistry {
    /// Open a registry over `store`, loading whatever it already holds.
    pub fn new(
        store: Box<dyn ValidatorStore>,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, RegistryError> {
        let state = match store.load()? {
            Some(state) => state.validated()?,
            None => RegistryState::new(),
        };
        time_source.observe(state.last_event_at());
        info!("[cl-01] Validator registry loaded ({} validators)", state.len());
        Ok(Self {
            inner: RwLock::new(RegistryInner { state, store }),
            time_source,
        })
    }

    /// Empty registry backed by memory only.
    pub fn in_memory(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                state: RegistryState::new(),
                store: Box::new(InMemoryValidatorStore::new()),
            }),
            time_source,
        }
    }

    /// Registry persisted as `validators.json` inside `data_dir`.
    pub fn open_dir(
        data_dir: &Path,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, RegistryError> {
        Self::new(Box::new(JsonFileValidatorStore::in_dir(data_dir)), time_source)
    }

    /// Shared clock used for every registry timestamp.
    pub fn time_source(&self) -> Arc<dyn TimeSource> {
        Arc::clone(&self.time_source)
    }

    pub fn len(&self) -> usize {
        self.inner.read().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().state.is_empty()
    }

    /// Snapshot of every validator, in id order.
    pub fn all(&self) -> Vec<Validator> {
        self.inner.read().state.validators.clone()
    }

    /// Enroll the founding validator as `#0`.
    ///
    /// Succeeds without changes if `#0` already is this founder with this key,
    /// so a genesis attempt that failed after enrollment can be retried.
    pub fn register_founder(
        &self,
        identity: &str,
        public_key: PublicKey,
    ) -> Result<ValidatorId, RegistryError> {
        self.mutate(|state, at| {
            if let Some(founder) = state.get(FOUNDER_ID) {
                let same_founder = founder.identity == identity
                    && founder.public_key_at(founder.registered_at) == Some(public_key);
                return if same_founder {
                    Ok((FOUNDER_ID, false))
                } else {
                    Err(RegistryError::FounderConflict {
                        existing: founder.identity.clone(),
                    })
                };
            }
            Ok((state.insert(identity, public_key, FOUNDER_TAG, at)?, true))
        })
    }

    /// Apply `op` to a copy of the state at a fresh instant, persist, commit.
    ///
    /// `op` returns the result plus whether anything changed; unchanged
    /// state skips the store.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut RegistryState, Timestamp) -> Result<(T, bool), RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut inner = self.inner.write();
        let at = self.time_source.now();

        let mut next = inner.state.clone();
        let (value, changed) = op(&mut next, at)?;
        if changed {
            if let Err(e) = inner.store.save(&next) {
                warn!("[cl-01] ⚠️ Registry write failed, state unchanged: {}", e);
                return Err(RegistryError::Persistence(e));
            }
            inner.state = next;
        }
        Ok(value)
    }

    fn set_active(&self, id: ValidatorId, active: bool) -> Result<(), RegistryError> {
        let changed = self.mutate(|state, at| {
            let validator = state
                .get_mut(id)
                .ok_or(RegistryError::UnknownValidator(id))?;
            let changed = validator.set_active(active, at)?;
            Ok((changed, changed))
        })?;
        if changed {
            info!(
                "[cl-01] Validator #{} {}",
                id,
                if active { "activated" } else { "deactivated" }
            );
        } else {
            debug!("[cl-01] Validator #{} already in requested state", id);
        }
        Ok(())
    }
}

impl ValidatorRegistryApi for ValidatorRegistry {
    fn register_validator(
        &self,
        identity: &str,
        public_key: PublicKey,
        authority_tag: &str,
    ) -> Result<ValidatorId, RegistryError> {
        let id = self.mutate(|state, at| {
            Ok((state.insert(identity, public_key, authority_tag, at)?, true))
        })?;
        info!(
            "[cl-01] ✅ Registered validator #{} {} ({})",
            id, identity, authority_tag
        );
        Ok(id)
    }

    fn activate(&self, id: ValidatorId) -> Result<(), RegistryError> {
        self.set_active(id, true)
    }

    fn deactivate(&self, id: ValidatorId) -> Result<(), RegistryError> {
        self.set_active(id, false)
    }

    fn is_active(&self, id: ValidatorId, at: Timestamp) -> bool {
        self.inner
            .read()
            .state
            .get(id)
            .is_some_and(|v| v.is_active_at(at))
    }

    fn get_public_key(&self, id: ValidatorId) -> Result<PublicKey, RegistryError> {
        self.inner
            .read()
            .state
            .get(id)
            .map(Validator::public_key)
            .ok_or(RegistryError::UnknownValidator(id))
    }

    fn public_key_at(&self, id: ValidatorId, at: Timestamp) -> Option<PublicKey> {
        self.inner
            .read()
            .state
            .get(id)
            .and_then(|v| v.public_key_at(at))
    }

    fn rotate_public_key(
        &self,
        id: ValidatorId,
        public_key: PublicKey,
    ) -> Result<(), RegistryError> {
        let rotated = self.mutate(|state, at| {
            let validator = state
                .get_mut(id)
                .ok_or(RegistryError::UnknownValidator(id))?;
            let rotated = validator.rotate_key(public_key, at)?;
            Ok((rotated, rotated))
        })?;
        if rotated {
            info!("[cl-01] 🔑 Validator #{} rotated its key", id);
        }
        Ok(())
    }

    fn lookup(&self, identity: &str) -> Option<ValidatorId> {
        self.inner.read().state.lookup(identity)
    }

    fn get(&self, id: ValidatorId) -> Option<Validator> {
        self.inner.read().state.get(id).cloned()
    }

    fn active_validators(&self, at: Timestamp) -> Vec<Validator> {
        self.inner
            .read()
            .state
            .validators
            .iter()
            .filter(|v| v.is_active_at(at))
            .cloned()
            .collect()
    }

    fn authorize(&self, identity: &str) -> Result<Authorization, RegistryError> {
        let inner = self.inner.read();
        let validator = inner
            .state
            .by_identity(identity)
            .ok_or_else(|| RegistryError::UnknownIdentity(identity.to_string()))?;

        // Taken under the lock: no mutation can slip between check and instant.
        let at = self.time_source.now();
        if !validator.is_active_at(at) {
            return Err(RegistryError::InactiveValidator {
                id: validator.id,
                identity: validator.identity.clone(),
            });
        }

        Ok(Authorization {
            validator_id: validator.id,
            at,
            public_key: validator.public_key(),
        })
    }
}
