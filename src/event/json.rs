use std::collections::BTreeMap;
use std::str::FromStr;

use super::field_ref;
use super::timestamp::Timestamp;
use super::value::Value;
use super::Event;
use crate::error::{InterpolationError, Result};

/// Key under which an event carries its designated timestamp.
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// An event decoded from a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonEvent {
    fields: BTreeMap<String, Value>,
}

impl JsonEvent {
    /// Create an empty event with no timestamp
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an event from parsed JSON.
    ///
    /// The input must be an object. `@timestamp`, when present, must be an
    /// RFC 3339 string or an integer count of epoch milliseconds.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        let mut object = match json {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(InterpolationError::UnknownEvent {
                    kind: json_kind(&other),
                })
            }
        };

        let timestamp = match object.remove(TIMESTAMP_FIELD) {
            None | Some(serde_json::Value::Null) => None,
            Some(raw) => Some(decode_timestamp(raw)?),
        };

        let mut fields: BTreeMap<String, Value> = object
            .into_iter()
            .map(|(k, v)| (k, Value::from_json(v)))
            .collect();
        if let Some(ts) = timestamp {
            fields.insert(TIMESTAMP_FIELD.to_string(), Value::Timestamp(ts));
        }

        Ok(Self { fields })
    }

    /// Set a top-level field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set the event timestamp
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.fields
            .insert(TIMESTAMP_FIELD.to_string(), Value::Timestamp(timestamp));
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl Event for JsonEvent {
    fn get_field(&self, path: &str) -> Option<&Value> {
        field_ref::resolve(&self.fields, path)
    }

    fn timestamp(&self) -> Option<Timestamp> {
        match self.fields.get(TIMESTAMP_FIELD) {
            Some(Value::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }
}

impl FromStr for JsonEvent {
    type Err = InterpolationError;

    fn from_str(s: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| InterpolationError::InvalidEvent(format!("malformed JSON: {e}")))?;
        Self::from_json(json)
    }
}

fn decode_timestamp(raw: serde_json::Value) -> Result<Timestamp> {
    match raw {
        serde_json::Value::String(s) => s.parse::<Timestamp>().map_err(|e| {
            InterpolationError::InvalidEvent(format!(
                "{TIMESTAMP_FIELD} {s:?} is not an RFC 3339 date-time: {e}"
            ))
        }),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(Timestamp::from_epoch_millis)
            .ok_or_else(|| {
                InterpolationError::InvalidEvent(format!(
                    "{TIMESTAMP_FIELD} {n} is not a valid epoch millisecond value"
                ))
            }),
        other => Err(InterpolationError::InvalidEvent(format!(
            "{TIMESTAMP_FIELD} must be a string or integer, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
