//! # Ledger Admin
//!
//! Operator CLI for one Civic-Ledger data directory.
//!
//! ## Modular Structure
//!
//! - `cli` - clap definitions
//! - `config` - `AdminConfig` from `CL_*` environment variables
//! - `container` - opens registry, ledger and aggregator over the data directory
//! - `commands` - executes one command, writing to any `Write`
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Initialize logging from `CL_LOG_LEVEL` / `CL_JSON_LOGS`
//! 3. Load `AdminConfig`, apply `--data-dir`
//! 4. Open the container (takes the directory lock)
//! 5. Run the command; `verify` exits with status 2 on violations

pub mod cli;
pub mod commands;
pub mod config;
pub mod container;

pub use cli::{Cli, Command};
pub use commands::{execute, run, Outcome};
pub use config::AdminConfig;
pub use container::LedgerContainer;
