//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `DocumentIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    params::Refresh,
    DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::IndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::DocumentIndexProvider;
use crate::opensearch::index_config::get_index_settings;
use crate::opensearch::queries::build_list_query;
use crate::types::{ListQuery, SearchHits};

/// OpenSearch client implementation.
///
/// Operates on the single index named by its `IndexConfig`.
///
/// # Example
///
/// ```ignore
/// use search_store_repository::{IndexConfig, OpenSearchProvider};
///
/// let config = IndexConfig::new("items", "document");
/// let provider = OpenSearchProvider::new("http://localhost:9200", config).await?;
///
/// if !provider.index_exists().await? {
///     provider.create_index().await?;
/// }
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index the provider operates on
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            document_type = %index_config.document_type,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    fn refresh(&self) -> Refresh {
        if self.index_config.refresh_on_write {
            Refresh::True
        } else {
            Refresh::False
        }
    }

    /// Map a 404 response body to the matching not-found error.
    ///
    /// OpenSearch answers 404 both for a missing document and for a missing
    /// index; only the error type in the body tells them apart.
    fn not_found_error(&self, body: &Value, doc_id: &str) -> SearchIndexError {
        let error_type = body
            .get("error")
            .and_then(|e| e.get("type"))
            .and_then(|t| t.as_str());

        match error_type {
            Some("index_not_found_exception") => {
                SearchIndexError::index_not_found(&self.index_config.name)
            }
            _ => SearchIndexError::document_not_found(doc_id),
        }
    }

    /// Extract the document source from a get response body.
    fn parse_get_response(body: Value, doc_id: &str) -> Result<Value, SearchIndexError> {
        if !body.get("found").and_then(|f| f.as_bool()).unwrap_or(false) {
            return Err(SearchIndexError::document_not_found(doc_id));
        }

        match body {
            Value::Object(mut map) => map
                .remove("_source")
                .ok_or_else(|| SearchIndexError::parse("Get response has no _source")),
            _ => Err(SearchIndexError::parse("Get response is not an object")),
        }
    }

    /// Extract the hit sources and total from a search response body.
    ///
    /// `hits.total` is an object (`{"value": n}`) on 7.x engines and a plain
    /// number on older ones.
    fn parse_hits(body: &Value) -> Result<SearchHits, SearchIndexError> {
        let hits = body
            .get("hits")
            .ok_or_else(|| SearchIndexError::parse("Search response has no hits"))?;

        let total = hits
            .get("total")
            .and_then(|t| t.get("value").or(Some(t)))
            .and_then(|t| t.as_u64())
            .unwrap_or(0);

        let sources = hits
            .get("hits")
            .and_then(|h| h.as_array())
            .map(|array| {
                array
                    .iter()
                    .filter_map(|hit| hit.get("_source").cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(SearchHits { total, sources })
    }
}

async fn error_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

async fn json_body(response: Response) -> Value {
    response.json::<Value>().await.unwrap_or(json!({}))
}

#[async_trait]
impl DocumentIndexProvider for OpenSearchProvider {
    fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => {
                error!(status = status, index = %self.index_config.name, "Index exists request failed");
                Err(SearchIndexError::index_management(format!(
                    "Index exists check failed with status {}",
                    status
                )))
            }
        }
    }

    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn create_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index_config.name))
            .body(get_index_settings(&self.index_config))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!("Index created");
            return Ok(());
        }

        let error_body = error_body(response).await;
        // Lost a creation race with another writer
        if error_body.contains("resource_already_exists_exception") {
            debug!("Index already exists");
            return Ok(());
        }

        error!(status = %status, body = %error_body, "Index creation failed");
        Err(SearchIndexError::index_management(format!(
            "Index creation failed with status {}: {}",
            status, error_body
        )))
    }

    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn close_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = error_body(response).await;
            return Err(SearchIndexError::index_management(format!(
                "Index close failed with status {}: {}",
                status, error_body
            )));
        }

        info!("Index closed");
        Ok(())
    }

    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn delete_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_management(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(&self.index_config.name));
        }
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Index deletion failed");
            return Err(SearchIndexError::index_management(format!(
                "Index deletion failed with status {}: {}",
                status, error_body
            )));
        }

        info!("Index deleted");
        Ok(())
    }

    async fn index_document(&self, doc_id: &str, document: Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index_config.name, doc_id))
            .refresh(self.refresh())
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    async fn get_document(&self, doc_id: &str) -> Result<Value, SearchIndexError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index_config.name, doc_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::get(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            let body = json_body(response).await;
            return Err(self.not_found_error(&body, doc_id));
        }
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(SearchIndexError::get(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        debug!(doc_id = %doc_id, "Document fetched");
        Self::parse_get_response(body, doc_id)
    }

    async fn update_document(&self, doc_id: &str, partial: Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(&self.index_config.name, doc_id))
            .refresh(self.refresh())
            .body(json!({ "doc": partial }))
            .send()
            .await
            .map_err(|e| SearchIndexError::update(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            let body = json_body(response).await;
            return Err(self.not_found_error(&body, doc_id));
        }
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Update request failed");
            return Err(SearchIndexError::update(format!(
                "Update failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document updated");
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.name, doc_id))
            .refresh(self.refresh())
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            let body = json_body(response).await;
            return Err(self.not_found_error(&body, doc_id));
        }
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn search(&self, query: &ListQuery) -> Result<SearchHits, SearchIndexError> {
        let body = build_list_query(&self.index_config, query);

        let response = self
            .client
            .search(SearchParts::Index(&[self.index_config.name.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = error_body(response).await;
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let hits = Self::parse_hits(&body)?;
        debug!(total = hits.total, returned = hits.sources.len(), "Search completed");
        Ok(hits)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let health = json_body(response).await;
        let status = health
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        info!(status = %status, "OpenSearch cluster status");
        Ok(status == "green" || status == "yellow")
    }
}
