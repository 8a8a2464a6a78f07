//! Validator domain entities

use serde::{Deserialize, Serialize};
use shared_crypto::PublicKey;
use shared_types::Timestamp;

use super::errors::RegistryError;

/// Sequential validator identifier. The founder is `#0`.
pub type ValidatorId = u64;

/// Id assigned to the founding validator by genesis.
pub const FOUNDER_ID: ValidatorId = 0;

/// Authority tag given to the founding validator.
pub const FOUNDER_TAG: &str = "founder";

/// Direction of a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusChange {
    Activated,
    Deactivated,
}

/// One entry of a validator's activation history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub at: Timestamp,
    pub change: StatusChange,
}

/// A public key and the instant from which it is in force.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEpoch {
    pub from: Timestamp,
    pub public_key: PublicKey,
}

/// A registered validator with its full history.
///
/// Both histories are ordered by timestamp and only ever appended to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub id: ValidatorId,
    pub identity: String,
    pub authority_tag: String,
    pub registered_at: Timestamp,
    pub key_history: Vec<KeyEpoch>,
    pub status_history: Vec<StatusEvent>,
}

impl Validator {
    /// Create an active validator registered at `at`.
    pub fn new(
        id: ValidatorId,
        identity: impl Into<String>,
        public_key: PublicKey,
        authority_tag: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            id,
            identity: identity.into(),
            authority_tag: authority_tag.into(),
            registered_at: at,
            key_history: vec![KeyEpoch {
                from: at,
                public_key,
            }],
            status_history: vec![StatusEvent {
                at,
                change: StatusChange::Activated,
            }],
        }
    }

    /// Current status.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status_history.last(),
            Some(StatusEvent {
                change: StatusChange::Activated,
                ..
            })
        )
    }

    /// Status in force at `at`: the latest event at or before `at` decides.
    ///
    /// Before registration the validator is inactive.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.status_history
            .iter()
            .rev()
            .find(|event| event.at <= at)
            .is_some_and(|event| event.change == StatusChange::Activated)
    }

    /// Current public key.
    pub fn public_key(&self) -> PublicKey {
        // key_history always has the registration entry
        self.key_history[self.key_history.len() - 1].public_key
    }

    /// Key in force at `at`, if the validator was registered by then.
    pub fn public_key_at(&self, at: Timestamp) -> Option<PublicKey> {
        self.key_history
            .iter()
            .rev()
            .find(|epoch| epoch.from <= at)
            .map(|epoch| epoch.public_key)
    }

    /// Newest instant recorded in either history.
    pub fn last_event_at(&self) -> Timestamp {
        let status = self.status_history.last().map_or(0, |event| event.at);
        let key = self.key_history.last().map_or(0, |epoch| epoch.from);
        status.max(key).max(self.registered_at)
    }

    fn ensure_after_history(&self, at: Timestamp) -> Result<(), RegistryError> {
        let last = self.last_event_at();
        if at <= last {
            return Err(RegistryError::HistoryRegression {
                id: self.id,
                last,
                at,
            });
        }
        Ok(())
    }

    /// Both histories start at registration and strictly increase.
    pub fn check_history(&self) -> Result<(), RegistryError> {
        let invalid = |what: &str| {
            Err(RegistryError::InvalidValidator(format!(
                "validator #{} has {}",
                self.id, what
            )))
        };
        match (self.status_history.first(), self.key_history.first()) {
            (Some(status), Some(key)) => {
                if status.change != StatusChange::Activated
                    || status.at != self.registered_at
                    || key.from != self.registered_at
                {
                    return invalid("a history that does not start at registration");
                }
            }
            _ => return invalid("an empty history"),
        }
        if self.status_history.windows(2).any(|w| w[0].at >= w[1].at) {
            return invalid("an out-of-order status history");
        }
        if self.key_history.windows(2).any(|w| w[0].from >= w[1].from) {
            return invalid("an out-of-order key history");
        }
        Ok(())
    }

    /// Record a status change. Returns `false` when the status already matches.
    ///
    /// `at` must be later than every recorded event.
    pub fn set_active(&mut self, active: bool, at: Timestamp) -> Result<bool, RegistryError> {
        if self.is_active() == active {
            return Ok(false);
        }
        self.ensure_after_history(at)?;
        let change = if active {
            StatusChange::Activated
        } else {
            StatusChange::Deactivated
        };
        self.status_history.push(StatusEvent { at, change });
        Ok(true)
    }

    /// Start a new key epoch at `at`. Returns `false` if the key is unchanged.
    pub fn rotate_key(
        &mut self,
        public_key: PublicKey,
        at: Timestamp,
    ) -> Result<bool, RegistryError> {
        if self.public_key() == public_key {
            return Ok(false);
        }
        self.ensure_after_history(at)?;
        self.key_history.push(KeyEpoch {
            from: at,
            public_key,
        });
        Ok(true)
    }
}

/// Grant returned by `authorize`: the signer is active at `at` under `public_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authorization {
    pub validator_id: ValidatorId,
    pub at: Timestamp,
    pub public_key: PublicKey,
}
