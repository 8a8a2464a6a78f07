//! # Ledger Telemetry
//!
//! Logging bootstrap shared by the Civic-Ledger binaries. Library crates only
//! emit `tracing` events (prefixed `[cl-NN]`); binaries call [`init_logging`]
//! once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // ...
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CL_LOG_LEVEL` / `RUST_LOG` | `info` | `EnvFilter` directive |
//! | `CL_JSON_LOGS` | `false` | JSON lines output |
//! | `CL_SERVICE_NAME` | `civic-ledger` | Service name field |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
