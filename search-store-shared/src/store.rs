//! Item store trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::item::{Factory, Item};
use crate::list::ListOptions;

/// Generic persistence for [`Item`]s.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across async tasks.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item. The store may assign an ID or timestamps to it.
    async fn create(&self, item: &mut dyn Item) -> Result<(), StoreError>;

    /// Load the stored state of `item` (located by its identity) into it.
    async fn read(&self, item: &mut dyn Item) -> Result<(), StoreError>;

    /// Overwrite the stored state of an existing item.
    async fn update(&self, item: &mut dyn Item) -> Result<(), StoreError>;

    /// Remove an item.
    async fn delete(&self, item: &dyn Item) -> Result<(), StoreError>;

    /// List items of the factory's namespace.
    ///
    /// Returns an empty vector when nothing matches.
    async fn list(
        &self,
        factory: &dyn Factory,
        options: &ListOptions,
    ) -> Result<Vec<Box<dyn Item>>, StoreError>;

    /// Release backend resources.
    async fn close(&self) -> Result<(), StoreError>;
}
