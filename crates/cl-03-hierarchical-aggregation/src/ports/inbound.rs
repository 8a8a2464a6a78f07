//! # Inbound Ports (Driving Ports)

use crate::domain::aggregate::Aggregate;
use crate::domain::errors::AggregationError;
use crate::domain::level::Level;

/// Hierarchical Aggregation API.
///
/// Each `try_close_*` closes at most one aggregate per call and is a no-op
/// when fewer than `threshold` unfolded children are available.
pub trait HierarchicalAggregationApi: Send + Sync {
    fn try_close(&self, level: Level) -> Result<Option<Aggregate>, AggregationError>;

    fn try_close_chapter(&self) -> Result<Option<Aggregate>, AggregationError> {
        self.try_close(Level::Chapter)
    }

    fn try_close_book(&self) -> Result<Option<Aggregate>, AggregationError> {
        self.try_close(Level::Book)
    }

    fn try_close_part(&self) -> Result<Option<Aggregate>, AggregationError> {
        self.try_close(Level::Part)
    }

    fn try_close_series(&self) -> Result<Option<Aggregate>, AggregationError> {
        self.try_close(Level::Series)
    }

    /// Close everything currently closable, bottom-up.
    fn roll_up(&self) -> Result<Vec<Aggregate>, AggregationError>;

    /// Closed aggregates at `level`, in position order.
    fn aggregates(&self, level: Level) -> Vec<Aggregate>;

    fn get(&self, level: Level, position: u64) -> Option<Aggregate>;

    /// Children at the level below not yet folded into a `level` aggregate.
    fn open_children(&self, level: Level) -> u64;
}
