//! Store error types.
//!
//! This module defines the errors every `ItemStore` backend reports to callers.

use thiserror::Error;

/// Errors that can occur during item store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The item does not support the serialization capability.
    #[error("Item is not serializable")]
    NotSerializable,

    /// The backing index does not exist for an operation that requires it.
    #[error("Index {index} does not exist, {operation} failed")]
    IndexMissing { index: String, operation: String },

    /// The requested item was not found.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The requested option is not supported by this backend.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Failed to serialize or deserialize an item.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create an index missing error.
    pub fn index_missing(index: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::IndexMissing {
            index: index.into(),
            operation: operation.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a not implemented error.
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether this error reports a missing item.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
