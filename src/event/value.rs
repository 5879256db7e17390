use std::collections::BTreeMap;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use super::timestamp::Timestamp;
use crate::error::Result;

/// A field value held by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null; treated the same as a missing field
    Null,
    Bool(bool),
    Integer(i64),
    /// Unsigned integer above `i64::MAX`
    UInteger(u64),
    Float(f64),
    String(String),
    Timestamp(Timestamp),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) | Value::UInteger(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Convert decoded JSON into an event value.
    ///
    /// Integers that fit in `i64` or `u64` stay exact; every other number
    /// becomes a float.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInteger(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render the value as JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Append the natural string form of a value.
    ///
    /// Lists are joined with `,` and maps are rendered as JSON, so this can
    /// fail only when a map holds something JSON cannot represent.
    pub fn write_to(&self, out: &mut String) -> Result<()> {
        match self {
            Value::Null => {}
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => out.push_str(&i.to_string()),
            Value::UInteger(u) => out.push_str(&u.to_string()),
            Value::Float(f) => write_float(*f, out),
            Value::String(s) => out.push_str(s),
            Value::Timestamp(t) => out.push_str(&t.to_string()),
            Value::List(items) => join(items, ",", out)?,
            Value::Map(_) => out.push_str(&self.to_json()?),
        }
        Ok(())
    }
}

// Plain decimal in [1e-3, 1e7), scientific `d.dddE<n>` outside it, and always
// at least one fractional digit.
fn write_float(f: f64, out: &mut String) {
    if f.is_nan() {
        out.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        out.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
        return;
    }

    let magnitude = f.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = f.to_string();
        out.push_str(&plain);
        if !plain.contains('.') {
            out.push_str(".0");
        }
    } else {
        let sci = format!("{f:e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        out.push_str(mantissa);
        if !mantissa.contains('.') {
            out.push_str(".0");
        }
        out.push('E');
        out.push_str(exponent);
    }
}

/// Append `items` to `out`, separated by `separator`.
///
/// Null elements render as the empty string and nested lists are joined
/// recursively with the same separator.
pub fn join(items: &[Value], separator: &str, out: &mut String) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        match item {
            Value::List(nested) => join(nested, separator, out)?,
            other => other.write_to(out)?,
        }
    }
    Ok(())
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::UInteger(u) => serializer.serialize_u64(*u),
            Value::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "cannot serialize non-finite float {f}"
            ))),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => t.serialize(serializer),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Value::UInteger(u), Value::Integer)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut out = String::new();
        value.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_scalar_natural_forms() {
        assert_eq!(render(&Value::from(42)), "42");
        assert_eq!(render(&Value::from(true)), "true");
        assert_eq!(render(&Value::from("hello")), "hello");
        assert_eq!(render(&Value::from(1.5)), "1.5");
        assert_eq!(render(&Value::from(3.0)), "3.0");
        assert_eq!(render(&Value::Null), "");
    }

    #[test]
    fn test_join_flattens_nested_lists() {
        let value = Value::from(json!([1, [2, 3], null, "x"]));
        assert_eq!(render(&value), "1,2,3,,x");
    }

    #[test]
    fn test_join_custom_separator() {
        let items = vec![Value::from("a"), Value::from("b")];
        let mut out = String::new();
        join(&items, " | ", &mut out).unwrap();
        assert_eq!(out, "a | b");
    }

    #[test]
    fn test_join_empty_list() {
        let mut out = String::new();
        join(&[], ",", &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_map_renders_as_json() {
        let value = Value::from(json!({"b": 2, "a": [true, null]}));
        assert_eq!(render(&value), r#"{"a":[true,null],"b":2}"#);
    }

    #[test]
    fn test_non_finite_float_fails_serialization() {
        let mut map = BTreeMap::new();
        map.insert("ratio".to_string(), Value::Float(f64::NAN));
        let err = Value::Map(map).to_json().unwrap_err();
        assert!(err.is_serialization());
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_large_unsigned_stays_exact() {
        let value = Value::from_json(json!(u64::MAX));
        assert_eq!(value, Value::UInteger(u64::MAX));
        assert_eq!(render(&value), "18446744073709551615");

        let map = Value::from_json(json!({"id": u64::MAX}));
        assert_eq!(render(&map), r#"{"id":18446744073709551615}"#);

        assert_eq!(Value::from(7_u64), Value::Integer(7));
    }

    #[test]
    fn test_float_magnitudes() {
        assert_eq!(render(&Value::from(0.001)), "0.001");
        assert_eq!(render(&Value::from(0.00001)), "1.0E-5");
        assert_eq!(render(&Value::from(1234567.0)), "1234567.0");
        assert_eq!(render(&Value::from(1e7)), "1.0E7");
        assert_eq!(render(&Value::from(1.5e20)), "1.5E20");
        assert_eq!(render(&Value::from(-2.5e-4)), "-2.5E-4");
        assert_eq!(render(&Value::from(0.0)), "0.0");
        assert_eq!(render(&Value::from(-0.0)), "-0.0");
        assert_eq!(render(&Value::from(f64::NAN)), "NaN");
        assert_eq!(render(&Value::from(f64::NEG_INFINITY)), "-Infinity");
    }
}
