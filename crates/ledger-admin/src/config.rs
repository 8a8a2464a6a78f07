//! # Admin Configuration
//!
//! Environment first, then command-line overrides applied by `main`.

use anyhow::{Context, Result};
use cl_02_page_ledger::LedgerConfig;
use cl_03_hierarchical_aggregation::AggregationConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./civic-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Directory holding `pages.log`, the aggregate logs and `validators.json`.
    pub data_dir: PathBuf,
    pub ledger: LedgerConfig,
    pub aggregation: AggregationConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ledger: LedgerConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CL_DATA_DIR`: Data directory (default: ./civic-data)
    /// - `CL_MAX_PAYLOAD_BYTES`: Largest accepted payload
    /// - `CL_AGGREGATION_THRESHOLD`: Children per aggregate at every level
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("CL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("CL_MAX_PAYLOAD_BYTES") {
            let bytes = raw
                .parse()
                .with_context(|| format!("CL_MAX_PAYLOAD_BYTES is not a size: {:?}", raw))?;
            config.ledger = config.ledger.with_max_payload_bytes(bytes);
        }
        if let Some(raw) = lookup("CL_AGGREGATION_THRESHOLD") {
            let threshold = raw
                .parse()
                .with_context(|| format!("CL_AGGREGATION_THRESHOLD is not a count: {:?}", raw))?;
            config.aggregation = AggregationConfig::uniform(threshold);
        }

        config
            .aggregation
            .validate()
            .context("Invalid aggregation configuration")?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
