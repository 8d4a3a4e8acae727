//! Item contract.
//!
//! An [`Item`] only has to expose its identity. Everything else a backend may
//! need (serialization, ID assignment, timestamps) is an optional capability
//! the item advertises through the `as_*` accessors.

use chrono::{DateTime, Utc};

use crate::errors::StoreError;

/// A domain record that can be persisted by an `ItemStore`.
pub trait Item: Send + Sync {
    /// The item's identifier within its namespace.
    fn id(&self) -> String;

    /// The logical grouping this item belongs to. Items of the same domain
    /// type share a namespace.
    fn namespace(&self) -> String;

    /// Serialization capability, if supported.
    fn as_serializable(&self) -> Option<&dyn Serializable> {
        None
    }

    /// Mutable serialization capability, if supported.
    fn as_serializable_mut(&mut self) -> Option<&mut dyn Serializable> {
        None
    }

    /// External ID assignment capability, if supported.
    fn as_id_setter(&mut self) -> Option<&mut dyn IdSetter> {
        None
    }

    /// Timestamp tracking capability, if supported.
    fn as_time_tracker(&mut self) -> Option<&mut dyn TimeTracker> {
        None
    }
}

/// Converts an item to and from the byte payload stored by a backend.
pub trait Serializable {
    /// Serialize the item into a document body.
    fn marshal(&self) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the item in place from a document body.
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), StoreError>;
}

/// Allows a backend to assign an identifier to an item.
pub trait IdSetter {
    fn set_id(&mut self, id: String);
}

/// Creation and modification timestamps maintained by the backend.
pub trait TimeTracker {
    fn set_created(&mut self, at: DateTime<Utc>);
    fn set_updated(&mut self, at: DateTime<Utc>);
    fn created(&self) -> Option<DateTime<Utc>>;
    fn updated(&self) -> Option<DateTime<Utc>>;
}

/// Produces empty items of one concrete type.
///
/// Listing uses the factory both to learn which namespace to query and to
/// materialize each hit. Any `Fn() -> Box<dyn Item>` closure is a factory.
pub trait Factory: Send + Sync {
    fn new_item(&self) -> Box<dyn Item>;
}

impl<F> Factory for F
where
    F: Fn() -> Box<dyn Item> + Send + Sync,
{
    fn new_item(&self) -> Box<dyn Item> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare {
        id: String,
    }

    impl Item for Bare {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn namespace(&self) -> String {
            "bare".to_string()
        }
    }

    #[test]
    fn test_capabilities_default_to_none() {
        let mut item = Bare {
            id: "b1".to_string(),
        };

        assert!(item.as_serializable().is_none());
        assert!(item.as_serializable_mut().is_none());
        assert!(item.as_id_setter().is_none());
        assert!(item.as_time_tracker().is_none());
    }

    #[test]
    fn test_closure_factory() {
        let factory = || -> Box<dyn Item> {
            Box::new(Bare {
                id: String::new(),
            })
        };

        let item = Factory::new_item(&factory);
        assert_eq!(item.namespace(), "bare");
        assert!(item.id().is_empty());
    }
}
