//! JSON-file registry store (`validators.json`).
//!
//! Writes go to a sibling temp file which is synced and renamed over the
//! target, so a crash leaves either the old or the new registry.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use shared_types::StoreError;

use crate::domain::state::RegistryState;
use crate::ports::outbound::ValidatorStore;

/// File name used inside a ledger data directory.
pub const VALIDATORS_FILE: &str = "validators.json";

#[derive(Debug, Clone)]
pub struct JsonFileValidatorStore {
    path: PathBuf,
}

impl JsonFileValidatorStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/validators.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(VALIDATORS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ValidatorStore for JsonFileValidatorStore {
    fn load(&self) -> Result<Option<RegistryState>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state: RegistryState = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &RegistryState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::trace!("[cl-01] wrote {} validators to {}", state.len(), self.path.display());
        Ok(())
    }
}
