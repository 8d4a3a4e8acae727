//! Request and response types for document index operations.

use serde_json::Value;

use search_store_shared::{ListOptions, SortOrder};

/// A namespace-scoped listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Namespace every returned document must belong to.
    pub namespace: String,
    /// Number of documents to skip.
    pub offset: u64,
    /// Maximum number of documents to return. Zero leaves the window to the
    /// engine's default.
    pub limit: u64,
    /// Requested order.
    pub sort: SortOrder,
}

impl ListQuery {
    /// Build a listing request from generic list options.
    pub fn new(namespace: impl Into<String>, options: &ListOptions) -> Self {
        Self {
            namespace: namespace.into(),
            offset: options.offset(),
            limit: options.limit,
            sort: options.sort,
        }
    }
}

/// Documents returned by a search, in engine order.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    /// Total number of matching documents, across all pages.
    pub total: u64,
    /// The `_source` of each returned hit.
    pub sources: Vec<Value>,
}
