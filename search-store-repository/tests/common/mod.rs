//! In-memory `DocumentIndexProvider` for integration tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tokio::sync::Mutex;

use search_store_repository::{
    DocumentIndexProvider, IndexConfig, ListQuery, SearchHits, SearchIndexError,
};
use search_store_shared::SortOrder;

#[derive(Default)]
struct MemoryState {
    exists: bool,
    closed: bool,
    /// Insertion order doubles as natural order.
    documents: Vec<(String, Value)>,
}

/// Keeps one index in memory and answers list queries the way the engine
/// does: term match on the namespace field, field sort, then from/size.
/// Without a limit only the first `max_result_window` hits are returned.
pub struct MemoryProvider {
    index_config: IndexConfig,
    state: Mutex<MemoryState>,
}

impl MemoryProvider {
    pub fn new(index_config: IndexConfig) -> Self {
        Self {
            index_config,
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub async fn document_count(&self) -> usize {
        self.state.lock().await.documents.len()
    }
}

fn check_open(state: &MemoryState, index: &str) -> Result<(), SearchIndexError> {
    if !state.exists {
        return Err(SearchIndexError::index_not_found(index));
    }
    if state.closed {
        return Err(SearchIndexError::index_management(format!(
            "index [{}] is closed",
            index
        )));
    }
    Ok(())
}

fn parse_date(value: &Value) -> Option<DateTime<FixedOffset>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

fn compare_field(a: &Value, b: &Value) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl DocumentIndexProvider for MemoryProvider {
    fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        Ok(self.state.lock().await.exists)
    }

    async fn create_index(&self) -> Result<(), SearchIndexError> {
        self.state.lock().await.exists = true;
        Ok(())
    }

    async fn close_index(&self) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;
        state.closed = true;
        Ok(())
    }

    async fn delete_index(&self) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        if !state.exists {
            return Err(SearchIndexError::index_not_found(&self.index_config.name));
        }
        *state = MemoryState::default();
        Ok(())
    }

    async fn index_document(&self, doc_id: &str, document: Value) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;
        match state.documents.iter_mut().find(|(id, _)| id == doc_id) {
            Some((_, existing)) => *existing = document,
            None => state.documents.push((doc_id.to_string(), document)),
        }
        Ok(())
    }

    async fn get_document(&self, doc_id: &str) -> Result<Value, SearchIndexError> {
        let state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;
        state
            .documents
            .iter()
            .find(|(id, _)| id == doc_id)
            .map(|(_, document)| document.clone())
            .ok_or_else(|| SearchIndexError::document_not_found(doc_id))
    }

    async fn update_document(&self, doc_id: &str, partial: Value) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;
        let (_, document) = state
            .documents
            .iter_mut()
            .find(|(id, _)| id == doc_id)
            .ok_or_else(|| SearchIndexError::document_not_found(doc_id))?;
        if let (Some(target), Value::Object(fields)) = (document.as_object_mut(), partial) {
            target.extend(fields);
        }
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;
        let position = state
            .documents
            .iter()
            .position(|(id, _)| id == doc_id)
            .ok_or_else(|| SearchIndexError::document_not_found(doc_id))?;
        state.documents.remove(position);
        Ok(())
    }

    async fn search(&self, query: &ListQuery) -> Result<SearchHits, SearchIndexError> {
        let state = self.state.lock().await;
        check_open(&state, &self.index_config.name)?;

        let namespace_field = &self.index_config.namespace_field;
        let mut matches: Vec<&Value> = state
            .documents
            .iter()
            .map(|(_, document)| document)
            .filter(|document| document[namespace_field] == query.namespace.as_str())
            .collect();

        let sort = match query.sort {
            SortOrder::Natural => None,
            SortOrder::CreatedAsc => Some((&self.index_config.created_field, false)),
            SortOrder::CreatedDesc => Some((&self.index_config.created_field, true)),
            SortOrder::UpdatedAsc => Some((&self.index_config.updated_field, false)),
            SortOrder::UpdatedDesc => Some((&self.index_config.updated_field, true)),
        };
        if let Some((field, descending)) = sort {
            matches.sort_by(|a, b| {
                let ordering = compare_field(&a[field], &b[field]);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let total = matches.len() as u64;
        let window = if query.limit > 0 {
            let start = (query.offset as usize).min(matches.len());
            let end = start.saturating_add(query.limit as usize).min(matches.len());
            &matches[start..end]
        } else {
            let end = (self.index_config.max_result_window as usize).min(matches.len());
            &matches[..end]
        };

        Ok(SearchHits {
            total,
            sources: window.iter().map(|document| (*document).clone()).collect(),
        })
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }
}
