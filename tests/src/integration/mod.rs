//! Cross-crate scenarios. Everything here is `#[cfg(test)]`.

pub mod aggregation;
pub mod concurrency;
pub mod end_to_end;
pub mod persistence;
