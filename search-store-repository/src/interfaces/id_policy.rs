//! Document ID policies.
//!
//! A policy decides which document ID an item is stored under and may assign
//! an identifier to the item when it is created.

use uuid::Uuid;

use search_store_shared::Item;

/// Derives the document ID of an item.
///
/// `document_id` must be a deterministic function of the item's identity so
/// that re-creating an item overwrites its document instead of duplicating it.
pub trait IdPolicy: Send + Sync {
    /// Called on create, before the document ID is derived.
    fn assign(&self, _item: &mut dyn Item) {}

    /// The document ID for `item`.
    fn document_id(&self, item: &dyn Item) -> String;
}

/// Stores items under their caller-supplied ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemIdPolicy;

impl IdPolicy for ItemIdPolicy {
    fn document_id(&self, item: &dyn Item) -> String {
        item.id()
    }
}

/// Stores items under `{namespace}/{id}`, so equal IDs in different
/// namespaces don't collide.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedIdPolicy;

impl IdPolicy for NamespacedIdPolicy {
    fn document_id(&self, item: &dyn Item) -> String {
        namespaced_id(item)
    }
}

/// Like [`NamespacedIdPolicy`], and gives items created without an ID a
/// random UUID, provided they accept external ID assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedIdPolicy;

impl IdPolicy for GeneratedIdPolicy {
    fn assign(&self, item: &mut dyn Item) {
        if !item.id().is_empty() {
            return;
        }
        if let Some(setter) = item.as_id_setter() {
            setter.set_id(Uuid::new_v4().to_string());
        }
    }

    fn document_id(&self, item: &dyn Item) -> String {
        namespaced_id(item)
    }
}

fn namespaced_id(item: &dyn Item) -> String {
    format!("{}/{}", item.namespace(), item.id())
}
