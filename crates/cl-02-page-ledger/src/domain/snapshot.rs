//! Read-only view of the committed page sequence.

use std::ops::Deref;
use std::sync::Arc;

use super::page::Page;

/// Immutable snapshot of committed pages, ordered by `sequence_index`.
///
/// Cloning is an `Arc` bump; later appends are not visible.
#[derive(Clone, Debug, Default)]
pub struct LedgerSnapshot {
    pages: Arc<Vec<Page>>,
}

impl LedgerSnapshot {
    pub(crate) fn new(pages: Arc<Vec<Page>>) -> Self {
        Self { pages }
    }

    /// Build a snapshot from an explicit page list (tests and tooling).
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: Arc::new(pages),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Newest page.
    pub fn tip(&self) -> Option<&Page> {
        self.pages.last()
    }

    /// Genesis page, if present.
    pub fn genesis(&self) -> Option<&Page> {
        self.pages.first()
    }
}

impl Deref for LedgerSnapshot {
    type Target = [Page];

    fn deref(&self) -> &[Page] {
        &self.pages
    }
}
