//! Interface definitions for the document index backend.
//!
//! This module defines the abstract `DocumentIndexProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod document_index_provider;
mod id_policy;

pub use document_index_provider::DocumentIndexProvider;
pub use id_policy::{GeneratedIdPolicy, IdPolicy, ItemIdPolicy, NamespacedIdPolicy};
