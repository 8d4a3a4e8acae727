//! Dependency initialization and wiring for the search store.

use std::env;
use std::str::FromStr;

use tracing::info;

use crate::ServiceError;
use search_store_repository::{
    DocumentIndexProvider, GeneratedIdPolicy, IdPolicy, IndexConfig, ItemIdPolicy,
    NamespacedIdPolicy, OpenSearchProvider, SearchIndexStore, StoreConfig,
};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index name.
const DEFAULT_INDEX: &str = "items";

/// Default document type name.
const DEFAULT_DOC_TYPE: &str = "document";

/// How documents are keyed in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicyKind {
    /// Caller-supplied item ID.
    #[default]
    Item,
    /// `{namespace}/{id}`.
    Namespaced,
    /// `{namespace}/{id}` with generated IDs; natural list order only.
    Generated,
}

impl FromStr for IdPolicyKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "item" => Ok(Self::Item),
            "namespaced" => Ok(Self::Namespaced),
            "generated" => Ok(Self::Generated),
            other => Err(ServiceError::config(format!(
                "Unknown ID policy '{}', expected item, namespaced or generated",
                other
            ))),
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub opensearch_url: String,
    pub index: String,
    pub document_type: String,
    pub id_policy: IdPolicyKind,
    pub refresh_on_write: bool,
    pub strict_decoding: bool,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `SEARCH_STORE_INDEX`: Index name (default: items)
    /// - `SEARCH_STORE_DOC_TYPE`: Document type name (default: document)
    /// - `SEARCH_STORE_ID_POLICY`: item, namespaced or generated (default: item)
    /// - `SEARCH_STORE_REFRESH`: Refresh the index on every write, so items are
    ///   listable as soon as they are written (default: true)
    /// - `SEARCH_STORE_STRICT_DECODING`: Fail reads on undecodable documents (default: false)
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let id_policy = match lookup("SEARCH_STORE_ID_POLICY") {
            Some(value) => value.parse()?,
            None => IdPolicyKind::default(),
        };

        Ok(Self {
            opensearch_url: lookup("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            index: lookup("SEARCH_STORE_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            document_type: lookup("SEARCH_STORE_DOC_TYPE")
                .unwrap_or_else(|| DEFAULT_DOC_TYPE.to_string()),
            id_policy,
            refresh_on_write: parse_flag(&lookup, "SEARCH_STORE_REFRESH", true)?,
            strict_decoding: parse_flag(&lookup, "SEARCH_STORE_STRICT_DECODING", false)?,
        })
    }

    /// The index configuration these settings describe.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(&self.index, &self.document_type)
            .with_refresh_on_write(self.refresh_on_write)
    }

    /// Create an OpenSearch provider for the configured index.
    ///
    /// No request is sent; call `health_check` to verify the cluster.
    pub async fn connect(&self) -> Result<OpenSearchProvider, ServiceError> {
        Ok(OpenSearchProvider::new(&self.opensearch_url, self.index_config()).await?)
    }

    /// Wrap a provider in a store configured by these settings.
    pub fn build_store(&self, provider: Box<dyn DocumentIndexProvider>) -> SearchIndexStore {
        let (config, id_policy): (StoreConfig, Box<dyn IdPolicy>) = match self.id_policy {
            IdPolicyKind::Item => (StoreConfig::default(), Box::new(ItemIdPolicy)),
            IdPolicyKind::Namespaced => (StoreConfig::default(), Box::new(NamespacedIdPolicy)),
            IdPolicyKind::Generated => (StoreConfig::namespaced(), Box::new(GeneratedIdPolicy)),
        };

        SearchIndexStore::with_config(provider, config.with_strict_decoding(self.strict_decoding))
            .with_id_policy(id_policy)
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ServiceError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(ServiceError::config(format!(
                "{} must be a boolean, got '{}'",
                key, other
            ))),
        },
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured store ready to use.
    pub store: SearchIndexStore,
    /// The settings the store was built from.
    pub settings: Settings,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails
    pub async fn new() -> Result<Self, ServiceError> {
        Self::from_settings(Settings::from_env()?).await
    }

    /// Initialize all dependencies from explicit settings.
    pub async fn from_settings(settings: Settings) -> Result<Self, ServiceError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            index = %settings.index,
            id_policy = ?settings.id_policy,
            "Initializing dependencies"
        );

        let provider = settings.connect().await?;

        // Verify OpenSearch is reachable
        if !provider.health_check().await? {
            return Err(ServiceError::Unhealthy(settings.opensearch_url));
        }

        info!("OpenSearch connection verified");

        let store = settings.build_store(Box::new(provider));

        Ok(Self { store, settings })
    }
}
