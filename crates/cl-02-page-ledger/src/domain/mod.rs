//! Ledger domain: pages, genesis parameters, configuration, snapshots.

pub mod config;
pub mod errors;
pub mod genesis;
pub mod page;
pub mod snapshot;
