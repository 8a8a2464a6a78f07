//! # Aggregation Configuration

use super::errors::AggregationError;
use super::level::Level;

/// Children per aggregate at every level unless overridden.
pub const DEFAULT_THRESHOLD: usize = 16;

/// How many children close one aggregate, per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    thresholds: [usize; 4],
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_THRESHOLD)
    }
}

impl AggregationConfig {
    /// Same threshold at every level.
    pub fn uniform(threshold: usize) -> Self {
        Self {
            thresholds: [threshold; 4],
        }
    }

    /// Override one level.
    pub fn with_threshold(mut self, level: Level, threshold: usize) -> Self {
        self.thresholds[level.index()] = threshold;
        self
    }

    pub fn threshold(&self, level: Level) -> usize {
        self.thresholds[level.index()]
    }

    pub fn validate(&self) -> Result<(), AggregationError> {
        for level in Level::ALL {
            if self.threshold(level) == 0 {
                return Err(AggregationError::InvalidConfig(format!(
                    "{} threshold must be at least 1",
                    level
                )));
            }
        }
        Ok(())
    }
}
