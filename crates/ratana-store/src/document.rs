//! Document and filter types crossing the store boundary.

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A document's field map. All fields are JSON-serializable scalars/objects.
pub type Fields = serde_json::Map<String, Value>;

/// A stored document: an identifier plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identifier, unique within its collection.
    pub id: String,
    /// The document's fields.
    pub fields: Fields,
}

impl Document {
    /// Create a document from an id and field map.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a raw field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field as a string slice.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Get a field as an integer.
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    /// Get a field as a float.
    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    /// Get a field as a bool.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// Get a field as an array of strings, skipping non-string entries.
    pub fn str_array_field(&self, name: &str) -> Vec<String> {
        self.field(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deserialize the document into a typed value.
    ///
    /// The document id is injected under an `"id"` key so typed records can
    /// carry it as a plain field.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// A query filter, in the equality-only style of the hosted store's API.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches documents whose field equals the given value.
    Equal {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
}

impl Filter {
    /// Create an equality filter.
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check whether a document matches this filter.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Equal { field, value } => doc.field(field) == Some(value),
        }
    }
}
