//! Record identity.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a record, as found in its `id_field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an identifier out of a JSON value.
    ///
    /// Integers and non-empty strings qualify; anything else does not.
    /// Integers beyond `i64` are kept as their decimal text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(RecordId::Int(i)),
                None if n.is_u64() => Some(RecordId::Text(n.to_string())),
                None => None,
            },
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// Parse user input.
    ///
    /// Only canonical integers become `Int`; `"007"` or `"+5"` stay `Text`
    /// so the id reaches the server exactly as typed.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => RecordId::Int(n),
            _ => RecordId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// A row type managed by an entity context.
///
/// The identifier is looked up by field name because the id field is part
/// of the resource configuration, not of the type.
pub trait Record:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn record_id(&self, id_field: &str) -> Option<RecordId> {
        let value = serde_json::to_value(self).ok()?;
        value.get(id_field).and_then(RecordId::from_json)
    }
}

impl Record for Value {
    fn record_id(&self, id_field: &str) -> Option<RecordId> {
        self.get(id_field).and_then(RecordId::from_json)
    }
}
