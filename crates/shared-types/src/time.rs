//! # Time Sources
//!
//! Abstract clock used for page admission and validator history.
//!
//! Both the registry and the ledger read the same `TimeSource`. Every call to
//! `now()` returns a value strictly greater than the previous one, so a
//! deactivation and an admission can never share an instant.

use crate::entities::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in microseconds since epoch. Strictly increasing.
    fn now(&self) -> Timestamp;

    /// Every later `now()` returns a value strictly greater than `at`.
    ///
    /// Stores call this on open with the newest timestamp they hold, so a
    /// wall clock behind persisted history cannot issue an older instant.
    fn observe(&self, at: Timestamp);
}

/// System clock, forced to be strictly monotonic.
///
/// If the wall clock stalls or steps backwards, the previous value plus one
/// microsecond is returned instead.
#[derive(Debug, Default)]
pub struct SystemTimeSource {
    last: AtomicU64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose first reading is strictly after `at`.
    pub fn after(at: Timestamp) -> Self {
        Self {
            last: AtomicU64::new(at),
        }
    }

    fn wall_clock() -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let wall = Self::wall_clock();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let next = wall.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    fn observe(&self, at: Timestamp) {
        self.last.fetch_max(at, Ordering::AcqRel);
    }
}

/// Manually driven clock for tests.
///
/// Each `now()` advances the clock by one tick; `advance` jumps ahead.
#[derive(Debug)]
pub struct ManualTimeSource {
    current: AtomicU64,
}

impl ManualTimeSource {
    /// Start the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: AtomicU64::new(start),
        }
    }

    /// Move the clock forward by `delta` microseconds.
    pub fn advance(&self, delta: u64) {
        self.current.fetch_add(delta, Ordering::AcqRel);
    }

    /// Peek at the current value without ticking.
    pub fn peek(&self) -> Timestamp {
        self.current.load(Ordering::Acquire)
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.current.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn observe(&self, at: Timestamp) {
        self.current.fetch_max(at, Ordering::AcqRel);
    }
}
