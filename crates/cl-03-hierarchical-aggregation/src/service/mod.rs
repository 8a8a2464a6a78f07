//! # Aggregation Service
//!
//! Owns every aggregate. Reads committed pages through ledger snapshots and
//! never takes the ledger's append lock: committed pages are immutable, so a
//! snapshot is a stable input.
//!
//! All closing runs under one `parking_lot::Mutex`, which makes each
//! `try_close` call atomic with respect to the others.


use cl_02_page_ledger::{LedgerSnapshot, PageLedgerApi};
use parking_lot::Mutex;
use shared_types::{Hash, TimeSource, ZERO_HASH};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{FileAggregateStore, InMemoryAggregateStore};
use crate::domain::aggregate::{compute_rollup_hash, Aggregate};
use crate::domain::config::AggregationConfig;
use crate::domain::errors::AggregationError;
use crate::domain::level::Level;
use crate::ports::inbound::HierarchicalAggregationApi;
use crate::ports::outbound::AggregateStore;

struct AggregatorState {
    store: Box<dyn AggregateStore>,
    /// Closed aggregates, indexed by `Level::index()`.
    levels: [Vec<Aggregate>; 4],
}

impl AggregatorState {
    fn closed(&self, level: Level) -> &[Aggregate] {
        &self.levels[level.index()]
    }

    /// Index of the first child not yet folded at `level`.
    fn next_child(&self, level: Level) -> u64 {
        self.closed(level).last().map_or(0, Aggregate::next_child)
    }

    /// Children available below `level`.
    fn available_children(&self, level: Level, pages: &LedgerSnapshot) -> u64 {
        match level.child_level() {
            None => pages.len() as u64,
            Some(child) => self.closed(child).len() as u64,
        }
    }
}

/// Covered page range and digest of one child.
struct ChildSummary {
    first_page: u64,
    last_page: u64,
    digest: Hash,
}

/// The Hierarchical Aggregator.
pub struct AggregationService {
    ledger: Arc<dyn PageLedgerApi>,
    state: Mutex<AggregatorState>,
    config: AggregationConfig,
    time_source: Arc<dyn TimeSource>,
}

impl AggregationService {
    /// Open over `store`, loading the aggregates it already holds.
    pub fn new(
        ledger: Arc<dyn PageLedgerApi>,
        store: Box<dyn AggregateStore>,
        config: AggregationConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, AggregationError> {
        config.validate()?;
        let levels = [
            store.load_level(Level::Chapter)?,
            store.load_level(Level::Book)?,
            store.load_level(Level::Part)?,
            store.load_level(Level::Series)?,
        ];
        if let Some(newest) = levels.iter().flatten().map(|agg| agg.closed_at).max() {
            time_source.observe(newest);
        }
        info!(
            "[cl-03] Aggregator loaded {} chapters, {} books, {} parts, {} series",
            levels[0].len(),
            levels[1].len(),
            levels[2].len(),
            levels[3].len()
        );
        Ok(Self {
            ledger,
            state: Mutex::new(AggregatorState { store, levels }),
            config,
            time_source,
        })
    }

    pub fn in_memory(
        ledger: Arc<dyn PageLedgerApi>,
        config: AggregationConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, AggregationError> {
        Self::new(
            ledger,
            Box::new(InMemoryAggregateStore::new()),
            config,
            time_source,
        )
    }

    /// Aggregates persisted in `<data_dir>/{chapters,books,parts,series}.log`.
    pub fn open_dir(
        data_dir: &Path,
        ledger: Arc<dyn PageLedgerApi>,
        config: AggregationConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, AggregationError> {
        let store = FileAggregateStore::open(data_dir)?;
        Self::new(ledger, Box::new(store), config, time_source)
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    fn child_summaries(
        state: &AggregatorState,
        level: Level,
        pages: &LedgerSnapshot,
        from: u64,
        count: u64,
    ) -> Vec<ChildSummary> {
        let range = (from as usize)..((from + count) as usize);
        match level.child_level() {
            None => pages.pages()[range]
                .iter()
                .map(|page| ChildSummary {
                    first_page: page.sequence_index,
                    last_page: page.sequence_index,
                    digest: page.page_hash,
                })
                .collect(),
            Some(child) => state.closed(child)[range]
                .iter()
                .map(|agg| ChildSummary {
                    first_page: agg.first_page,
                    last_page: agg.last_page,
                    digest: agg.rollup_hash,
                })
                .collect(),
        }
    }

    /// Close one aggregate at `level` if `threshold` children are waiting.
    fn close_one(
        &self,
        state: &mut AggregatorState,
        level: Level,
        pages: &LedgerSnapshot,
    ) -> Result<Option<Aggregate>, AggregationError> {
        let threshold = self.config.threshold(level) as u64;
        let first_child = state.next_child(level);
        let available = state.available_children(level, pages);
        if available.saturating_sub(first_child) < threshold {
            return Ok(None);
        }

        let children = Self::child_summaries(state, level, pages, first_child, threshold);
        let child_digests: Vec<Hash> = children.iter().map(|c| c.digest).collect();
        let first_page = children.first().map_or(0, |c| c.first_page);
        let last_page = children.last().map_or(0, |c| c.last_page);
        let position = state.closed(level).len() as u64;
        let prior_rollup_hash = state
            .closed(level)
            .last()
            .map_or(ZERO_HASH, |prev| prev.rollup_hash);

        let rollup_hash = compute_rollup_hash(
            level,
            position,
            first_child,
            first_page,
            last_page,
            &prior_rollup_hash,
            &child_digests,
        );
        let aggregate = Aggregate {
            level,
            position,
            first_child,
            first_page,
            last_page,
            child_digests,
            rollup_hash,
            prior_rollup_hash,
            closed_at: self.time_source.now(),
        };

        if let Err(e) = state.store.append(&aggregate) {
            warn!("[cl-03] ⚠️ Could not persist {} {}: {}", level, position, e);
            return Err(AggregationError::Persistence(e));
        }
        state.levels[level.index()].push(aggregate.clone());

        info!(
            "[cl-03] 📚 Closed {} {} (pages {}..={}, hash {})",
            level,
            position,
            aggregate.first_page,
            aggregate.last_page,
            aggregate.short_hash()
        );
        Ok(Some(aggregate))
    }
}

impl HierarchicalAggregationApi for AggregationService {
    fn try_close(&self, level: Level) -> Result<Option<Aggregate>, AggregationError> {
        let pages = self.ledger.snapshot();
        let mut state = self.state.lock();
        self.close_one(&mut state, level, &pages)
    }

    fn roll_up(&self) -> Result<Vec<Aggregate>, AggregationError> {
        let pages = self.ledger.snapshot();
        let mut state = self.state.lock();

        let mut closed = Vec::new();
        for level in Level::ALL {
            while let Some(aggregate) = self.close_one(&mut state, level, &pages)? {
                closed.push(aggregate);
            }
        }
        debug!("[cl-03] Roll-up closed {} aggregates", closed.len());
        Ok(closed)
    }

    fn aggregates(&self, level: Level) -> Vec<Aggregate> {
        self.state.lock().closed(level).to_vec()
    }

    fn get(&self, level: Level, position: u64) -> Option<Aggregate> {
        let state = self.state.lock();
        usize::try_from(position)
            .ok()
            .and_then(|i| state.closed(level).get(i).cloned())
    }

    fn open_children(&self, level: Level) -> u64 {
        let pages = self.ledger.snapshot();
        let state = self.state.lock();
        state
            .available_children(level, &pages)
            .saturating_sub(state.next_child(level))
    }
}
