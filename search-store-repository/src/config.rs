//! Configuration types for the search store.

use serde::{Deserialize, Serialize};

/// Default index name.
pub const DEFAULT_INDEX_NAME: &str = "items";

/// Default document type name.
pub const DEFAULT_DOCUMENT_TYPE: &str = "document";

/// Default `index.max_result_window` of the engine.
pub const DEFAULT_MAX_RESULT_WINDOW: u64 = 10_000;

/// Configuration of the index backing a store.
///
/// Deserializes from partial objects; missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Name of the index holding the documents.
    pub name: String,
    /// Document type name. Typeless engines ignore it; it is kept so
    /// deployments can carry the same configuration surface across versions.
    pub document_type: String,
    /// Number of primary shards used when the index is created.
    pub number_of_shards: u32,
    /// Number of replicas used when the index is created.
    pub number_of_replicas: u32,
    /// Document field holding the item namespace. Mapped as a keyword.
    pub namespace_field: String,
    /// Document field holding the creation time. Mapped as a date.
    pub created_field: String,
    /// Document field holding the last update time. Mapped as a date.
    pub updated_field: String,
    /// Make writes visible to search before returning.
    pub refresh_on_write: bool,
    /// Largest `from + size` a search may request. Listing without a limit
    /// asks for this many hits; it is also set on the index at creation.
    pub max_result_window: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME, DEFAULT_DOCUMENT_TYPE)
    }
}

impl IndexConfig {
    /// Create a config for the given index and document type.
    pub fn new(name: impl Into<String>, document_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document_type: document_type.into(),
            number_of_shards: 1,
            number_of_replicas: 1,
            namespace_field: "namespace".to_string(),
            created_field: "created_at".to_string(),
            updated_field: "updated_at".to_string(),
            refresh_on_write: false,
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }

    /// Set whether writes refresh the index.
    pub fn with_refresh_on_write(mut self, refresh: bool) -> Self {
        self.refresh_on_write = refresh;
        self
    }

    /// Set the shard and replica counts used at creation.
    pub fn with_shards(mut self, shards: u32, replicas: u32) -> Self {
        self.number_of_shards = shards;
        self.number_of_replicas = replicas;
        self
    }

    /// Set the largest result window a search may request.
    pub fn with_max_result_window(mut self, window: u64) -> Self {
        self.max_result_window = window;
        self
    }

    /// Override the namespace and timestamp field names.
    pub fn with_fields(
        mut self,
        namespace: impl Into<String>,
        created: impl Into<String>,
        updated: impl Into<String>,
    ) -> Self {
        self.namespace_field = namespace.into();
        self.created_field = created.into();
        self.updated_field = updated.into();
        self
    }
}

/// Behaviour switches for `SearchIndexStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Delegate non-natural sort orders to the engine. When disabled, listing
    /// with any order other than natural fails with `NotImplemented`.
    pub native_sort: bool,
    /// Return decode failures from read and list instead of logging them.
    pub strict_decoding: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            native_sort: true,
            strict_decoding: false,
        }
    }
}

impl StoreConfig {
    /// Config used with namespaced document IDs: natural order only.
    pub fn namespaced() -> Self {
        Self {
            native_sort: false,
            ..Default::default()
        }
    }

    /// Enable or disable strict decoding.
    pub fn with_strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_config_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.name, "items");
        assert_eq!(config.document_type, "document");
        assert_eq!(config.namespace_field, "namespace");
        assert!(!config.refresh_on_write);
        assert_eq!(config.max_result_window, 10_000);
    }

    #[test]
    fn test_store_config_presets() {
        assert!(StoreConfig::default().native_sort);
        assert!(!StoreConfig::namespaced().native_sort);
        assert!(!StoreConfig::namespaced().strict_decoding);
        assert!(StoreConfig::default().with_strict_decoding(true).strict_decoding);
    }

    #[test]
    fn test_index_config_partial_json() {
        let config: IndexConfig = serde_json::from_str(
            r#"{"name": "notes", "number_of_shards": 3, "refresh_on_write": true}"#,
        )
        .unwrap();

        assert_eq!(config.name, "notes");
        assert_eq!(config.document_type, "document");
        assert_eq!(config.number_of_shards, 3);
        assert_eq!(config.number_of_replicas, 1);
        assert_eq!(config.created_field, "created_at");
        assert!(config.refresh_on_write);

        let store: StoreConfig = serde_json::from_str(r#"{"strict_decoding": true}"#).unwrap();
        assert!(store.native_sort);
        assert!(store.strict_decoding);
    }
}
