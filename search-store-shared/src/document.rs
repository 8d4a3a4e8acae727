//! A schemaless item backed by a JSON object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;
use crate::item::{Factory, IdSetter, Item, Serializable, TimeTracker};

/// A generic item: identity, timestamps and arbitrary JSON fields.
///
/// Serializes to a flat JSON object, e.g.
/// `{"id":"a1","namespace":"notes","created_at":"…","title":"hello"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl JsonDocument {
    /// Create an empty document with the given identity.
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Set a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build a document from a JSON object. `id` and `namespace` keys, when
    /// present, populate the identity; every other key becomes a field.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        if !value.is_object() {
            return Err(StoreError::serialization("document must be a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// A factory producing empty documents in `namespace`.
    pub fn factory(namespace: impl Into<String>) -> impl Factory {
        let namespace = namespace.into();
        move || -> Box<dyn Item> { Box::new(JsonDocument::new(namespace.clone(), "")) }
    }
}

impl Item for JsonDocument {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn namespace(&self) -> String {
        self.namespace.clone()
    }

    fn as_serializable(&self) -> Option<&dyn Serializable> {
        Some(self)
    }

    fn as_serializable_mut(&mut self) -> Option<&mut dyn Serializable> {
        Some(self)
    }

    fn as_id_setter(&mut self) -> Option<&mut dyn IdSetter> {
        Some(self)
    }

    fn as_time_tracker(&mut self) -> Option<&mut dyn TimeTracker> {
        Some(self)
    }
}

impl Serializable for JsonDocument {
    fn marshal(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<(), StoreError> {
        *self = serde_json::from_slice(data)?;
        Ok(())
    }
}

impl IdSetter for JsonDocument {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl TimeTracker for JsonDocument {
    fn set_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }

    fn set_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
