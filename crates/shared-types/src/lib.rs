//! # Shared Types Crate
//!
//! Primitives used by every Civic-Ledger subsystem.
//!
//! ## Contents
//!
//! - `entities` - `Hash`, `Timestamp` and display helpers
//! - `time` - `TimeSource` port with a strictly monotonic system clock
//! - `log` - Framed append-only log used for pages and aggregates
//! - `lock` - Exclusive lock on a ledger data directory
//! - `errors` - `StoreError` shared by the storage adapters
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hashes and timestamps have one definition.
//! - **Append-only persistence**: nothing in this crate rewrites history; a
//!   failed append is rolled back by truncation.

pub mod entities;
pub mod errors;
pub mod lock;
pub mod log;
pub mod time;

pub use entities::*;
pub use errors::StoreError;
pub use lock::DirectoryLock;
pub use log::{AppendLog, FileAppendLog, MemoryAppendLog};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
