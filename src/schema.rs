//! Dump/load contracts for entity payloads.
//!
//! `dump` goes through serde; `load` reads field by field through
//! [`FieldReader`] so that every failure names the offending field.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SdkResult, ValidationError};

/// Version string of the server-side graph model the packed formats follow
pub const DFG_VERSION: &str = "0.18.1";

/// Detailed (mapping) form of an entity
pub trait EntitySchema: Sized {
    /// Serialize to the detailed mapping
    fn dump(&self) -> SdkResult<Value>;

    /// Deserialize from the detailed mapping
    fn load(value: &Value) -> Result<Self, ValidationError>;
}

/// Compact wire form used by the add mutations
pub trait PackedSchema {
    fn dumps_packed(&self) -> SdkResult<String>;
}

/// Dump any serde-serializable entity
pub(crate) fn dump_serialized<T: Serialize>(entity: &T) -> SdkResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

/// Field-by-field reader over a JSON object
pub struct FieldReader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    /// Wrap `value`, which must be an object
    pub fn new(entity: &str, value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(ValidationError::new(
                entity,
                format!("expected an object, found {}", kind_of(other)),
            )),
        }
    }

    /// Raw value of a field, treating `null` as absent
    pub fn raw(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    /// A field that must be present
    pub fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T, ValidationError> {
        let value = self
            .raw(field)
            .ok_or_else(|| ValidationError::new(field, "missing required field"))?;
        decode(field, value)
    }

    /// A field that may be absent or null
    pub fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, ValidationError> {
        self.raw(field).map(|value| decode(field, value)).transpose()
    }

    /// A field that falls back to `T::default()`
    pub fn or_default<T: DeserializeOwned + Default>(
        &self,
        field: &str,
    ) -> Result<T, ValidationError> {
        Ok(self.optional(field)?.unwrap_or_default())
    }

    /// A field that falls back to the value built by `default`
    pub fn or_else<T: DeserializeOwned>(
        &self,
        field: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ValidationError> {
        Ok(self.optional(field)?.unwrap_or_else(default))
    }

    /// A required timestamp, see [`parse_timestamp`]
    pub fn timestamp(&self, field: &str) -> Result<DateTime<Utc>, ValidationError> {
        let value = self
            .raw(field)
            .ok_or_else(|| ValidationError::new(field, "missing required field"))?;
        parse_timestamp(field, value)
    }

    /// A timestamp that falls back to the current time
    pub fn timestamp_or_now(&self, field: &str) -> Result<DateTime<Utc>, ValidationError> {
        match self.raw(field) {
            Some(value) => parse_timestamp(field, value),
            None => Ok(Utc::now()),
        }
    }

    /// A nested entity list keyed by one of its own fields, e.g. `solveKey`
    pub fn keyed_list<T>(
        &self,
        field: &str,
        key_field: &str,
        load: impl Fn(&Value) -> Result<T, ValidationError>,
    ) -> Result<std::collections::BTreeMap<String, T>, ValidationError> {
        let mut entries = std::collections::BTreeMap::new();
        let Some(value) = self.raw(field) else {
            return Ok(entries);
        };
        let items = value.as_array().ok_or_else(|| {
            ValidationError::new(field, format!("expected a list, found {}", kind_of(value)))
        })?;
        for (index, item) in items.iter().enumerate() {
            let key = item
                .get(key_field)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ValidationError::new(
                        format!("{}.{}.{}", field, index, key_field),
                        "missing required field",
                    )
                })?
                .to_string();
            let entry = load(item).map_err(|e| e.nested(&format!("{}.{}", field, key)))?;
            entries.insert(key, entry);
        }
        Ok(entries)
    }
}

fn decode<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T, ValidationError> {
    T::deserialize(value).map_err(|e| ValidationError::new(field, e.to_string()))
}

/// Parse an RFC 3339 string or the server's `{ "formatted": "..." }` wrapper
pub fn parse_timestamp(field: &str, value: &Value) -> Result<DateTime<Utc>, ValidationError> {
    let text = match value {
        Value::String(text) => text.as_str(),
        Value::Object(map) => map
            .get("formatted")
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::new(field, "timestamp object has no 'formatted'"))?,
        other => {
            return Err(ValidationError::new(
                field,
                format!("expected a timestamp, found {}", kind_of(other)),
            ))
        }
    };
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| ValidationError::new(field, format!("invalid timestamp '{}': {}", text, e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Serialize a solve-key map as the list shape the API uses
pub(crate) mod keyed {
    use serde::ser::SerializeSeq;
    use serde::{Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, T>(map: &BTreeMap<String, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let mut seq = serializer.serialize_seq(Some(map.len()))?;
        for value in map.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}
