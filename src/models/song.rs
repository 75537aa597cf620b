use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the field that identifies a song inside the collection.
pub const ID_FIELD: &str = "id";

/// A song document. Only `id` is constrained; every other field is kept as-is.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Song(Map<String, Value>);

impl Song {
    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Song(fields)),
            _ => None,
        }
    }

    /// The integer `id`, if the document carries one.
    pub fn id(&self) -> Option<i64> {
        self.0.get(ID_FIELD).and_then(Value::as_i64)
    }

    /// Shallow merge: top-level fields in `patch` overwrite those in `self`.
    pub fn merge(&mut self, patch: &SongPatch) {
        for (key, value) in patch.fields() {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

/// Partial field mapping applied by an update. Never carries `id`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct SongPatch(Map<String, Value>);

impl SongPatch {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut fields) => {
                fields.remove(ID_FIELD);
                Some(SongPatch(fields))
            }
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
