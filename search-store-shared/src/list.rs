//! Listing options.

use std::fmt;
use std::sync::Arc;

use crate::item::Item;

/// Order in which listed items are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Whatever order the backend returns.
    #[default]
    Natural,
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl SortOrder {
    /// Whether this order requires the backend to sort.
    pub fn is_natural(&self) -> bool {
        matches!(self, Self::Natural)
    }
}

/// A predicate over listed items.
pub trait Filter: Send + Sync {
    fn compare(&self, item: &dyn Item) -> bool;
}

/// Pagination, ordering and filtering for `ItemStore::list`.
///
/// `page` is zero-based; the backend skips `page * limit` items.
#[derive(Clone, Default)]
pub struct ListOptions {
    pub page: u64,
    pub limit: u64,
    pub sort: SortOrder,
    pub filter: Option<Arc<dyn Filter>>,
}

impl ListOptions {
    /// Create options for the given page and page size with natural order.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    /// Set the sort order.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Set a filter predicate.
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }
}

impl fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("sort", &self.sort)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}
