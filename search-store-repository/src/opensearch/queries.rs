//! OpenSearch query builders.
//!
//! This module turns a `ListQuery` into an OpenSearch search body.

use serde_json::{json, Map, Value};

use search_store_shared::SortOrder;

use crate::config::IndexConfig;
use crate::types::ListQuery;

/// Build the search body for a namespace-scoped listing.
///
/// The body handles:
/// - A `bool` query with a `term` on the namespace field
/// - `from`/`size` paging; without a limit, the first `max_result_window` hits
/// - A field sort on the created or updated field for non-natural orders
pub fn build_list_query(config: &IndexConfig, query: &ListQuery) -> Value {
    let mut term = Map::new();
    term.insert(config.namespace_field.clone(), json!(query.namespace));

    let mut body = json!({
        "query": {
            "bool": {
                "must": [
                    { "term": term }
                ]
            }
        }
    });

    if query.limit > 0 {
        body["from"] = json!(query.offset);
        body["size"] = json!(query.limit);
    } else {
        body["from"] = json!(0);
        body["size"] = json!(config.max_result_window);
    }

    if let Some(sort) = build_sort(config, query.sort) {
        body["sort"] = sort;
    }

    body
}

/// Build the `sort` clause for an order, or `None` for natural order.
fn build_sort(config: &IndexConfig, sort: SortOrder) -> Option<Value> {
    let (field, order) = match sort {
        SortOrder::Natural => return None,
        SortOrder::CreatedAsc => (&config.created_field, "asc"),
        SortOrder::CreatedDesc => (&config.created_field, "desc"),
        SortOrder::UpdatedAsc => (&config.updated_field, "asc"),
        SortOrder::UpdatedDesc => (&config.updated_field, "desc"),
    };

    let mut clause = Map::new();
    clause.insert(field.clone(), json!({ "order": order }));
    Some(json!([clause]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_store_shared::ListOptions;

    #[test]
    fn test_natural_query() {
        let config = IndexConfig::default();
        let query = ListQuery::new("notes", &ListOptions::new(2, 10));

        let body = build_list_query(&config, &query);

        assert_eq!(
            body,
            json!({
                "query": { "bool": { "must": [ { "term": { "namespace": "notes" } } ] } },
                "from": 20,
                "size": 10
            })
        );
    }

    #[test]
    fn test_query_without_limit() {
        let config = IndexConfig::default();
        let query = ListQuery::new("notes", &ListOptions::default());

        let body = build_list_query(&config, &query);

        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10_000);
        assert!(body.get("sort").is_none());
    }

    #[test]
    fn test_query_without_limit_ignores_page() {
        let config = IndexConfig::default().with_max_result_window(500);
        let query = ListQuery::new("notes", &ListOptions::new(3, 0));

        let body = build_list_query(&config, &query);

        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 500);
    }

    #[test]
    fn test_sorted_queries() {
        let config = IndexConfig::default();
        let cases = [
            (SortOrder::CreatedAsc, "created_at", "asc"),
            (SortOrder::CreatedDesc, "created_at", "desc"),
            (SortOrder::UpdatedAsc, "updated_at", "asc"),
            (SortOrder::UpdatedDesc, "updated_at", "desc"),
        ];

        for (sort, field, order) in cases {
            let options = ListOptions::new(0, 5).with_sort(sort);
            let body = build_list_query(&config, &ListQuery::new("notes", &options));
            assert_eq!(body["sort"][0][field]["order"], order, "{:?}", sort);
        }
    }

    #[test]
    fn test_custom_namespace_field() {
        let config = IndexConfig::default().with_fields("Namespace", "CreatedAt", "UpdatedAt");
        let options = ListOptions::new(0, 5).with_sort(SortOrder::UpdatedAsc);

        let body = build_list_query(&config, &ListQuery::new("notes", &options));

        assert_eq!(body["query"]["bool"]["must"][0]["term"]["Namespace"], "notes");
        assert_eq!(body["sort"][0]["UpdatedAt"]["order"], "asc");
    }
}
