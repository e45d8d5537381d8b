//! [`FieldValue`]: the typed value stored in one record field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::crypto::CipherError;

/// A single field value with its type preserved across encryption.
///
/// Converts to and from plain JSON. Inside ciphertext it travels as a
/// type-tagged envelope, so `Integer(300)` never comes back as `Text("300")`
/// or `Float(300.0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Unsigned integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    Text(String),
    /// Nested arrays and objects, kept as JSON.
    Structured(Value),
}

// Type tags of the encrypted envelope.
const TAG_NULL: &str = "null";
const TAG_BOOL: &str = "bool";
const TAG_INT: &str = "int";
const TAG_UINT: &str = "uint";
const TAG_FLOAT: &str = "float";
const TAG_STR: &str = "str";
const TAG_JSON: &str = "json";

#[derive(Serialize, Deserialize)]
struct Envelope {
    t: String,
    v: Value,
}

impl FieldValue {
    /// The envelope tag naming this value's type.
    pub fn type_tag(&self) -> &'static str {
        match self {
            FieldValue::Null => TAG_NULL,
            FieldValue::Bool(_) => TAG_BOOL,
            FieldValue::Integer(_) => TAG_INT,
            FieldValue::Unsigned(_) => TAG_UINT,
            FieldValue::Float(_) => TAG_FLOAT,
            FieldValue::Text(_) => TAG_STR,
            FieldValue::Structured(_) => TAG_JSON,
        }
    }

    /// Serialise as `{"t": <tag>, "v": <payload>}`.
    ///
    /// Floats are carried as their IEEE-754 bit pattern so NaN, infinities and
    /// the sign of zero survive.
    pub(crate) fn to_tagged_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let v = match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Unsigned(u) => Value::from(*u),
            FieldValue::Float(f) => Value::from(f.to_bits()),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Structured(v) => v.clone(),
        };
        serde_json::to_vec(&Envelope {
            t: self.type_tag().to_owned(),
            v,
        })
    }

    /// Inverse of [`FieldValue::to_tagged_bytes`].
    pub(crate) fn from_tagged_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        let Envelope { t, v } = serde_json::from_slice(bytes)
            .map_err(|_| CipherError::MalformedCiphertext("plaintext is not a tagged value"))?;

        let mismatch = || CipherError::TypeTagMismatch(format!("payload does not fit tag `{t}`"));
        match t.as_str() {
            TAG_NULL if v.is_null() => Ok(FieldValue::Null),
            TAG_BOOL => v.as_bool().map(FieldValue::Bool).ok_or_else(mismatch),
            TAG_INT => v.as_i64().map(FieldValue::Integer).ok_or_else(mismatch),
            TAG_UINT => v.as_u64().map(FieldValue::Unsigned).ok_or_else(mismatch),
            TAG_FLOAT => v
                .as_u64()
                .map(|bits| FieldValue::Float(f64::from_bits(bits)))
                .ok_or_else(mismatch),
            TAG_STR => match v {
                Value::String(s) => Ok(FieldValue::Text(s)),
                _ => Err(mismatch()),
            },
            TAG_JSON => Ok(FieldValue::Structured(v)),
            TAG_NULL => Err(mismatch()),
            other => Err(CipherError::TypeTagMismatch(format!("unknown tag `{other}`"))),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Unsigned(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::Text(s),
            structured @ (Value::Array(_) | Value::Object(_)) => FieldValue::Structured(structured),
        }
    }
}

impl From<FieldValue> for Value {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Integer(i) => Value::from(i),
            FieldValue::Unsigned(u) => Value::from(u),
            FieldValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Structured(v) => v,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i.into())
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(FieldValue::Unsigned(u), FieldValue::Integer)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Unsigned(u) => serializer.serialize_u64(*u),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Structured(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}
