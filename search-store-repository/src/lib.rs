//! # Search Store Repository
//!
//! This crate backs the generic item-store contract with a search engine
//! index. It includes the `SearchIndexStore` adapter, the
//! `DocumentIndexProvider` interface it is built on, document ID policies,
//! and a concrete provider for OpenSearch.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexStore;
pub use config::{IndexConfig, StoreConfig};
pub use errors::SearchIndexError;
pub use interfaces::{
    DocumentIndexProvider, GeneratedIdPolicy, IdPolicy, ItemIdPolicy, NamespacedIdPolicy,
};
pub use opensearch::OpenSearchProvider;
pub use types::{ListQuery, SearchHits};
