//! Document index provider trait definition.
//!
//! This module defines the abstract interface for single-index document
//! operations, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory, etc.).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::IndexConfig;
use crate::errors::SearchIndexError;
use crate::types::{ListQuery, SearchHits};

/// Abstracts the underlying search index implementation.
///
/// A provider is bound to exactly one index, described by its `IndexConfig`.
/// Implementations are injected into `SearchIndexStore`, which layers the
/// item-store contract (existence checks, ID derivation, serialization) on
/// top.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations. `Arc<P>` is a provider too, so one
/// provider can back several stores.
#[async_trait]
pub trait DocumentIndexProvider: Send + Sync {
    /// The configuration of the index this provider operates on.
    fn index_config(&self) -> &IndexConfig;

    /// Check whether the index exists.
    async fn index_exists(&self) -> Result<bool, SearchIndexError>;

    /// Create the index with its settings and mappings.
    ///
    /// Succeeds if the index was created concurrently by another caller.
    async fn create_index(&self) -> Result<(), SearchIndexError>;

    /// Close the index. A closed index rejects reads and writes.
    async fn close_index(&self) -> Result<(), SearchIndexError>;

    /// Delete the index and every document in it.
    async fn delete_index(&self) -> Result<(), SearchIndexError>;

    /// Index a document under `doc_id`, replacing any existing document.
    async fn index_document(&self, doc_id: &str, document: Value) -> Result<(), SearchIndexError>;

    /// Fetch the source of the document stored under `doc_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The document source
    /// * `Err(SearchIndexError::DocumentNotFound)` - If no such document exists
    /// * `Err(SearchIndexError)` - If the request fails
    async fn get_document(&self, doc_id: &str) -> Result<Value, SearchIndexError>;

    /// Merge `partial` into the document stored under `doc_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was updated
    /// * `Err(SearchIndexError::DocumentNotFound)` - If the document doesn't exist
    /// * `Err(SearchIndexError)` - If the update fails
    async fn update_document(&self, doc_id: &str, partial: Value) -> Result<(), SearchIndexError>;

    /// Delete the document stored under `doc_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted
    /// * `Err(SearchIndexError::DocumentNotFound)` - If the document doesn't exist
    /// * `Err(SearchIndexError)` - If the deletion fails
    async fn delete_document(&self, doc_id: &str) -> Result<(), SearchIndexError>;

    /// Run a namespace-scoped listing query.
    async fn search(&self, query: &ListQuery) -> Result<SearchHits, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}

#[async_trait]
impl<P> DocumentIndexProvider for Arc<P>
where
    P: DocumentIndexProvider + ?Sized,
{
    fn index_config(&self) -> &IndexConfig {
        (**self).index_config()
    }

    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        (**self).index_exists().await
    }

    async fn create_index(&self) -> Result<(), SearchIndexError> {
        (**self).create_index().await
    }

    async fn close_index(&self) -> Result<(), SearchIndexError> {
        (**self).close_index().await
    }

    async fn delete_index(&self) -> Result<(), SearchIndexError> {
        (**self).delete_index().await
    }

    async fn index_document(&self, doc_id: &str, document: Value) -> Result<(), SearchIndexError> {
        (**self).index_document(doc_id, document).await
    }

    async fn get_document(&self, doc_id: &str) -> Result<Value, SearchIndexError> {
        (**self).get_document(doc_id).await
    }

    async fn update_document(&self, doc_id: &str, partial: Value) -> Result<(), SearchIndexError> {
        (**self).update_document(doc_id, partial).await
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), SearchIndexError> {
        (**self).delete_document(doc_id).await
    }

    async fn search(&self, query: &ListQuery) -> Result<SearchHits, SearchIndexError> {
        (**self).search(query).await
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        (**self).health_check().await
    }
}
