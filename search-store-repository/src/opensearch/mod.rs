//! OpenSearch implementation of the document index provider.
//!
//! This module provides a concrete implementation of `DocumentIndexProvider`
//! using OpenSearch as the backend.

mod client;
mod index_config;
mod queries;

pub use client::OpenSearchProvider;
pub use index_config::get_index_settings;
pub use queries::build_list_query;
