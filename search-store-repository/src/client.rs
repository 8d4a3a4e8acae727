//! Search index store implementation.
//!
//! This module provides `SearchIndexStore`, the `ItemStore` backed by a
//! document index. Every operation confirms the index exists, derives the
//! document ID through the configured `IdPolicy`, and issues one request to
//! the provider.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use search_store_shared::{Factory, Item, ItemStore, ListOptions, StoreError};

use crate::config::StoreConfig;
use crate::interfaces::{DocumentIndexProvider, GeneratedIdPolicy, IdPolicy, ItemIdPolicy};
use crate::types::ListQuery;

/// An `ItemStore` that keeps one document per item in a search index.
///
/// The index is created lazily on the first create; every other operation
/// fails with `StoreError::IndexMissing` until then.
pub struct SearchIndexStore {
    provider: Box<dyn DocumentIndexProvider>,
    id_policy: Box<dyn IdPolicy>,
    config: StoreConfig,
}

impl SearchIndexStore {
    /// Create a store keyed by caller-supplied item IDs, with default configuration.
    pub fn new(provider: Box<dyn DocumentIndexProvider>) -> Self {
        Self::with_config(provider, StoreConfig::default())
    }

    /// Create a store keyed by caller-supplied item IDs, with custom configuration.
    pub fn with_config(provider: Box<dyn DocumentIndexProvider>, config: StoreConfig) -> Self {
        Self {
            provider,
            id_policy: Box::new(ItemIdPolicy),
            config,
        }
    }

    /// Create a store keyed by `{namespace}/{id}` that generates IDs for new
    /// items and only lists in natural order.
    pub fn namespaced(provider: Box<dyn DocumentIndexProvider>) -> Self {
        Self::with_config(provider, StoreConfig::namespaced())
            .with_id_policy(Box::new(GeneratedIdPolicy))
    }

    /// Replace the document ID policy.
    pub fn with_id_policy(mut self, id_policy: Box<dyn IdPolicy>) -> Self {
        self.id_policy = id_policy;
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn DocumentIndexProvider {
        self.provider.as_ref()
    }

    /// The store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn index_name(&self) -> &str {
        &self.provider.index_config().name
    }

    /// Create the index if it doesn't exist yet.
    async fn ensure_index(&self) -> Result<(), StoreError> {
        if !self.provider.index_exists().await? {
            self.provider.create_index().await?;
        }
        Ok(())
    }

    /// Fail with `IndexMissing` if the index doesn't exist.
    async fn require_index(&self, operation: &str) -> Result<(), StoreError> {
        if self.provider.index_exists().await? {
            Ok(())
        } else {
            Err(StoreError::index_missing(self.index_name(), operation))
        }
    }

    /// Serialize an item into a document body.
    ///
    /// The body must be a JSON object. The namespace field is added when the
    /// item's serialized form doesn't carry it, so listing can find the item.
    fn encode(&self, item: &dyn Item) -> Result<Value, StoreError> {
        let serializable = item.as_serializable().ok_or(StoreError::NotSerializable)?;
        let bytes = serializable.marshal()?;

        let mut document: Value = serde_json::from_slice(&bytes)?;
        let fields = document
            .as_object_mut()
            .ok_or_else(|| StoreError::serialization("item must serialize to a JSON object"))?;

        let namespace_field = &self.provider.index_config().namespace_field;
        if !fields.contains_key(namespace_field) {
            fields.insert(namespace_field.clone(), Value::String(item.namespace()));
        }

        Ok(document)
    }

    /// Deserialize a document body into an item.
    ///
    /// Unless strict decoding is enabled, failures are logged and the item is
    /// left as the decoder left it.
    fn decode(&self, item: &mut dyn Item, source: &Value) -> Result<(), StoreError> {
        let serializable = item
            .as_serializable_mut()
            .ok_or(StoreError::NotSerializable)?;

        let result = serde_json::to_vec(source)
            .map_err(StoreError::from)
            .and_then(|bytes| serializable.unmarshal(&bytes));

        match result {
            Ok(()) => Ok(()),
            Err(e) if self.config.strict_decoding => Err(e),
            Err(e) => {
                warn!(error = %e, "Failed to unmarshal document");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ItemStore for SearchIndexStore {
    #[instrument(skip_all, fields(index = %self.index_name(), namespace = %item.namespace()))]
    async fn create(&self, item: &mut dyn Item) -> Result<(), StoreError> {
        if item.as_serializable().is_none() {
            return Err(StoreError::NotSerializable);
        }

        self.ensure_index().await?;

        self.id_policy.assign(item);
        if let Some(tracker) = item.as_time_tracker() {
            let now = Utc::now();
            tracker.set_created(now);
            tracker.set_updated(now);
        }

        let doc_id = self.id_policy.document_id(item);
        let document = self.encode(item)?;

        self.provider.index_document(&doc_id, document).await?;

        debug!(doc_id = %doc_id, "Item created");
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.index_name(), namespace = %item.namespace()))]
    async fn read(&self, item: &mut dyn Item) -> Result<(), StoreError> {
        if item.as_serializable().is_none() {
            return Err(StoreError::NotSerializable);
        }

        self.require_index("read").await?;

        let doc_id = self.id_policy.document_id(item);
        let source = self.provider.get_document(&doc_id).await?;
        self.decode(item, &source)?;

        debug!(doc_id = %doc_id, "Item read");
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.index_name(), namespace = %item.namespace()))]
    async fn update(&self, item: &mut dyn Item) -> Result<(), StoreError> {
        if item.as_serializable().is_none() {
            return Err(StoreError::NotSerializable);
        }

        self.require_index("update").await?;

        if let Some(tracker) = item.as_time_tracker() {
            tracker.set_updated(Utc::now());
        }

        let doc_id = self.id_policy.document_id(item);
        let document = self.encode(item)?;

        self.provider.update_document(&doc_id, document).await?;

        debug!(doc_id = %doc_id, "Item updated");
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.index_name(), namespace = %item.namespace()))]
    async fn delete(&self, item: &dyn Item) -> Result<(), StoreError> {
        self.require_index("delete").await?;

        let doc_id = self.id_policy.document_id(item);
        self.provider.delete_document(&doc_id).await?;

        debug!(doc_id = %doc_id, "Item deleted");
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.index_name(), page = options.page, limit = options.limit))]
    async fn list(
        &self,
        factory: &dyn Factory,
        options: &ListOptions,
    ) -> Result<Vec<Box<dyn Item>>, StoreError> {
        if options.filter.is_some() {
            return Err(StoreError::not_implemented("list filters are not supported"));
        }
        if !options.sort.is_natural() && !self.config.native_sort {
            return Err(StoreError::not_implemented(format!(
                "sort order {:?} is not supported",
                options.sort
            )));
        }

        let probe = factory.new_item();
        if probe.as_serializable().is_none() {
            return Err(StoreError::NotSerializable);
        }

        self.require_index("list").await?;

        let query = ListQuery::new(probe.namespace(), options);
        let hits = self.provider.search(&query).await?;

        let mut items = Vec::with_capacity(hits.sources.len());
        for source in &hits.sources {
            let mut item = factory.new_item();
            self.decode(item.as_mut(), source)?;
            items.push(item);
        }

        debug!(total = hits.total, returned = items.len(), "Items listed");
        Ok(items)
    }

    async fn close(&self) -> Result<(), StoreError> {
        if let Err(e) = self.provider.close_index().await {
            error!(index = %self.index_name(), error = %e, "Unable to close index");
        }
        Ok(())
    }
}
