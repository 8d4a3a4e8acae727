use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use search_store_shared::{
    Factory, IdSetter, Item, Serializable, StoreError, TimeTracker,
};

/// The item type the scenarios store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteItem {
    pub id: String,
    pub namespace: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SuiteItem {
    pub fn new(
        namespace: impl Into<String>,
        id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// A factory producing empty items in `namespace`.
    pub fn factory(namespace: impl Into<String>) -> impl Factory {
        let namespace = namespace.into();
        move || -> Box<dyn Item> { Box::new(SuiteItem::new(namespace.clone(), "", "")) }
    }

    /// The serialized form, for content comparisons.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.marshal().expect("suite item always serializes")
    }
}

impl Item for SuiteItem {
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

impl Serializable for SuiteItem {
    fn marshal(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<(), StoreError> {
        *self = serde_json::from_slice(data)?;
        Ok(())
    }
}

impl IdSetter for SuiteItem {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl TimeTracker for SuiteItem {
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
