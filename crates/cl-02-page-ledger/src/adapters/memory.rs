//! In-memory page store with failure injection.

use shared_types::{AppendLog, MemoryAppendLog, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::page::Page;
use crate::ports::outbound::PageStore;

/// Handle that makes the next append of its store fail.
///
/// Obtained before the store is moved into the ledger.
#[derive(Clone, Debug, Default)]
pub struct FailureSwitch(Arc<AtomicBool>);

impl FailureSwitch {
    pub fn fail_next_append(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct InMemoryPageStore {
    log: MemoryAppendLog<Page>,
    switch: FailureSwitch,
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `pages` (tests that need a crafted history).
    pub fn with_pages(pages: Vec<Page>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for page in &pages {
            store.log.append(page)?;
        }
        Ok(store)
    }

    pub fn failure_switch(&self) -> FailureSwitch {
        self.switch.clone()
    }
}

impl PageStore for InMemoryPageStore {
    fn load_all(&self) -> Result<Vec<Page>, StoreError> {
        self.log.read_all()
    }

    fn append(&mut self, page: &Page) -> Result<(), StoreError> {
        if self.switch.take() {
            self.log.fail_next_append();
        }
        self.log.append(page)
    }

    fn page_count(&self) -> u64 {
        self.log.record_count()
    }
}
