//! # Outbound Ports (Driven Ports)
//!
//! Production: `FilePageStore` (framed `pages.log`)
//! Testing: `InMemoryPageStore`

use shared_types::StoreError;

use crate::domain::page::Page;

/// Append-only persistence for pages.
pub trait PageStore: Send + Sync {
    /// Every stored page in append order.
    fn load_all(&self) -> Result<Vec<Page>, StoreError>;

    /// Durably append one page. On error the store is unchanged.
    fn append(&mut self, page: &Page) -> Result<(), StoreError>;

    /// Number of stored pages.
    fn page_count(&self) -> u64;
}
