//! Owned message documents and path resolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::table::FieldLocation;

/// The decoded contents of one hub message.
///
/// A `Document` owns all of its data, so it never borrows from the datagram
/// buffer it was parsed from. The decoder stores one per [`crate::Kind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Creates an empty document.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the document has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the top-level field `name`, if present.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the `type` discriminator, if it is present and a string.
    pub fn discriminator(&self) -> Option<&str> {
        self.field("type").and_then(Value::as_str)
    }

    /// Walks `location` and returns the value found there.
    ///
    /// Any missing step (absent field, non-array, index out of range) yields
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempest_udp::{Document, FieldLocation};
    /// use serde_json::json;
    ///
    /// let doc = Document::try_from(json!({"obs": [[10, 20, 30]]})).unwrap();
    /// assert_eq!(doc.resolve(FieldLocation::Nested("obs", 0, 2)), Some(&json!(30)));
    /// assert_eq!(doc.resolve(FieldLocation::Nested("obs", 1, 0)), None);
    /// ```
    pub fn resolve(&self, location: FieldLocation) -> Option<&Value> {
        match location {
            FieldLocation::Field(name) => self.field(name),
            FieldLocation::Indexed(name, index) => self.field(name)?.get(index),
            FieldLocation::Nested(name, outer, inner) => {
                self.field(name)?.get(outer)?.get(inner)
            }
        }
    }

    /// Returns the underlying map.
    #[inline]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the document and returns it as a JSON value.
    #[inline]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Only JSON objects can become documents; anything else is returned unchanged.
impl TryFrom<Value> for Document {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }
}
