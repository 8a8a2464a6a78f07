//! File-backed page store: `<data_dir>/pages.log` under an exclusive `LOCK`.

use shared_types::{AppendLog, DirectoryLock, FileAppendLog, StoreError};
use std::path::Path;

use crate::domain::page::Page;
use crate::ports::outbound::PageStore;

/// File name of the page log inside a data directory.
pub const PAGES_FILE: &str = "pages.log";

/// Framed append-only page log.
///
/// Holds the data directory lock for as long as it lives, so only one
/// process at a time can write pages.
pub struct FilePageStore {
    log: FileAppendLog<Page>,
    _lock: DirectoryLock,
}

impl FilePageStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let lock = DirectoryLock::acquire(data_dir)?;
        let log = FileAppendLog::open(data_dir.join(PAGES_FILE))?;
        tracing::info!(
            "[cl-02] 📂 Page log opened at {} ({} pages)",
            log.path().display(),
            log.record_count()
        );
        Ok(Self { log, _lock: lock })
    }
}

impl PageStore for FilePageStore {
    fn load_all(&self) -> Result<Vec<Page>, StoreError> {
        self.log.read_all()
    }

    fn append(&mut self, page: &Page) -> Result<(), StoreError> {
        self.log.append(page)
    }

    fn page_count(&self) -> u64 {
        self.log.record_count()
    }
}
