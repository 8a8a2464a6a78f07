//! Aggregation domain: levels, aggregates, thresholds.

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod level;
