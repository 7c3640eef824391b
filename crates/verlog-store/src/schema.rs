//! Mapping between the logical [`Document`] and a collection's physical
//! record layout.
//!
//! Structurally identical collections disagree on field names: some store
//! the modification time as `update_time`, others as `last_update`. The
//! engine sees one logical attribute; [`CollectionSchema`] renames it on the
//! way in and out of the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use verlog_types::Document;

use crate::error::{StoreError, StoreResult};

const LOGICAL_ID_FIELD: &str = "d_id";
const LOGICAL_TIME_FIELD: &str = "update_time";
const LOGS_FIELD: &str = "logs";

/// Physical field names used by one collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSchema {
    /// Collection name, used in diagnostics.
    pub name: String,
    /// Field holding the document id.
    pub id_field: String,
    /// Field holding the modification time, on documents and log entries.
    pub update_time_field: String,
}

impl CollectionSchema {
    /// A collection storing the modification time as `update_time`.
    pub fn update_time(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: LOGICAL_ID_FIELD.into(),
            update_time_field: LOGICAL_TIME_FIELD.into(),
        }
    }

    /// A collection storing the modification time as `last_update`.
    pub fn last_update(name: impl Into<String>) -> Self {
        Self {
            update_time_field: "last_update".into(),
            ..Self::update_time(name)
        }
    }

    /// Encode a document into this collection's physical record.
    pub fn encode(&self, document: &Document) -> StoreResult<Value> {
        let mut value = serde_json::to_value(document)?;
        let root = self.object_mut(&mut value)?;
        rename(root, LOGICAL_ID_FIELD, &self.id_field);
        rename(root, LOGICAL_TIME_FIELD, &self.update_time_field);
        if let Some(Value::Array(logs)) = root.get_mut(LOGS_FIELD) {
            for entry in logs.iter_mut() {
                if let Value::Object(entry) = entry {
                    rename(entry, LOGICAL_TIME_FIELD, &self.update_time_field);
                }
            }
        }
        Ok(value)
    }

    /// Decode a physical record of this collection into a document.
    pub fn decode(&self, mut record: Value) -> StoreResult<Document> {
        let root = self.object_mut(&mut record)?;
        self.require(root, &self.id_field)?;
        self.require(root, &self.update_time_field)?;
        rename(root, &self.id_field, LOGICAL_ID_FIELD);
        rename(root, &self.update_time_field, LOGICAL_TIME_FIELD);
        if let Some(Value::Array(logs)) = root.get_mut(LOGS_FIELD) {
            for (index, entry) in logs.iter_mut().enumerate() {
                let Value::Object(entry) = entry else {
                    return Err(self.corrupt(format!("log entry {index} is not an object")));
                };
                self.require(entry, &self.update_time_field)?;
                rename(entry, &self.update_time_field, LOGICAL_TIME_FIELD);
            }
        }
        serde_json::from_value(record).map_err(|e| self.corrupt(e.to_string()))
    }

    fn object_mut<'a>(&self, value: &'a mut Value) -> StoreResult<&'a mut Map<String, Value>> {
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(self.corrupt("record is not an object".into())),
        }
    }

    fn require(&self, map: &Map<String, Value>, field: &str) -> StoreResult<()> {
        if map.contains_key(field) {
            Ok(())
        } else {
            Err(self.corrupt(format!("missing field `{field}`")))
        }
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::Corrupt {
            collection: self.name.clone(),
            reason,
        }
    }
}

impl Default for CollectionSchema {
    fn default() -> Self {
        Self::update_time("version_log")
    }
}

fn rename(map: &mut Map<String, Value>, from: &str, to: &str) {
    if from == to {
        return;
    }
    if let Some(value) = map.remove(from) {
        map.insert(to.to_string(), value);
    }
}
