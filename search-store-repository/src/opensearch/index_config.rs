//! OpenSearch index settings and mappings.

use serde_json::{json, Map, Value};

use crate::config::IndexConfig;

/// Get the settings and mappings used to create the item index.
///
/// Only the fields the store queries on are mapped explicitly:
/// - the namespace field is a **keyword**, so listing matches it exactly
/// - the created/updated fields are **dates**, so they sort chronologically
///
/// Every other item field is mapped dynamically on first write.
pub fn get_index_settings(config: &IndexConfig) -> Value {
    let mut properties = Map::new();
    properties.insert(config.namespace_field.clone(), json!({ "type": "keyword" }));
    properties.insert(config.created_field.clone(), json!({ "type": "date" }));
    properties.insert(config.updated_field.clone(), json!({ "type": "date" }));

    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas,
            "max_result_window": config.max_result_window
        },
        "mappings": {
            "properties": properties
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings(&IndexConfig::default());

        assert_eq!(settings["settings"]["number_of_shards"], 1);
        assert_eq!(settings["settings"]["number_of_replicas"], 1);
        assert_eq!(settings["settings"]["max_result_window"], 10_000);

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["namespace"]["type"], "keyword");
        assert_eq!(properties["created_at"]["type"], "date");
        assert_eq!(properties["updated_at"]["type"], "date");
    }

    #[test]
    fn test_index_settings_custom_fields() {
        let config = IndexConfig::new("things", "thing")
            .with_shards(3, 0)
            .with_fields("Namespace", "CreatedAt", "UpdatedAt");
        let settings = get_index_settings(&config);

        assert_eq!(settings["settings"]["number_of_shards"], 3);
        assert_eq!(settings["settings"]["number_of_replicas"], 0);

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["Namespace"]["type"], "keyword");
        assert_eq!(properties["CreatedAt"]["type"], "date");
        assert!(properties.get("namespace").is_none());
    }
}
