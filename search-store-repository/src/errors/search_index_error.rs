//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use search_store_shared::StoreError;
use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to check, create, close or delete the index.
    #[error("Index management error: {0}")]
    IndexManagementError(String),

    /// The index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to fetch a document.
    #[error("Get error: {0}")]
    GetError(String),

    /// Failed to update a document.
    #[error("Update error: {0}")]
    UpdateError(String),

    /// Failed to delete a document.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index management error.
    pub fn index_management(msg: impl Into<String>) -> Self {
        Self::IndexManagementError(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound(index.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a get error.
    pub fn get(msg: impl Into<String>) -> Self {
        Self::GetError(msg.into())
    }

    /// Create an update error.
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a document not found error.
    pub fn document_not_found(doc_id: &str) -> Self {
        Self::DocumentNotFound(format!("doc_id={}", doc_id))
    }
}

impl From<SearchIndexError> for StoreError {
    fn from(err: SearchIndexError) -> Self {
        match err {
            SearchIndexError::DocumentNotFound(msg) => StoreError::NotFound(msg),
            SearchIndexError::IndexNotFound(index) => {
                StoreError::backend(format!("Index not found: {}", index))
            }
            other => StoreError::backend(other.to_string()),
        }
    }
}
