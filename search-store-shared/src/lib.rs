//! # Search Store Shared
//!
//! The generic item-store contract. Domain types implement [`Item`] (and the
//! optional capability traits) and any [`ItemStore`] backend can persist them.

pub mod document;
pub mod errors;
pub mod item;
pub mod list;
pub mod store;

pub use document::JsonDocument;
pub use errors::StoreError;
pub use item::{Factory, IdSetter, Item, Serializable, TimeTracker};
pub use list::{Filter, ListOptions, SortOrder};
pub use store::ItemStore;
