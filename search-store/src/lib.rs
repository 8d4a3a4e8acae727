//! # Search Store
//!
//! Wiring for running the search-index item store: configuration from the
//! environment, logging setup, and dependency construction.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, IdPolicyKind, Settings};

use search_store_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while setting up or using the store.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The cluster answered but reported a red or unknown status.
    #[error("OpenSearch cluster at {0} is unhealthy")]
    Unhealthy(String),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
