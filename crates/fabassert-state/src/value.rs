use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A value as the document store holds it.
///
/// Binary values are stored as an attachment; JSON values as a document
/// carrying the store's own bookkeeping fields alongside the user's.
#[derive(Clone, Debug, PartialEq)]
pub enum StoredValue {
    Raw(Vec<u8>),
    Document(Map<String, Value>),
}

impl StoredValue {
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Wrap a JSON value. Non-object values are kept as raw JSON text.
    pub fn document(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Document(map),
            other => Self::Raw(other.to_string().into_bytes()),
        }
    }

    /// The user-visible value.
    ///
    /// Raw bytes become a (lossy) UTF-8 string. Documents lose every field
    /// whose name starts with `_` or `~`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Raw(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            Self::Document(map) => Value::Object(
                map.iter()
                    .filter(|(name, _)| !is_bookkeeping(name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            ),
        }
    }
}

fn is_bookkeeping(field: &str) -> bool {
    field.starts_with('_') || field.starts_with('~')
}

/// A key together with the value stored under it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key.escape_debug(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn raw_values_become_strings() {
        assert_eq!(StoredValue::raw("100").to_json(), json!("100"));
        assert_eq!(
            StoredValue::raw(vec![0xff, b'a']).to_json(),
            json!("\u{FFFD}a")
        );
    }

    #[test]
    fn bookkeeping_fields_are_stripped() {
        let doc = StoredValue::document(json!({
            "_id": "k1",
            "_rev": "1-abc",
            "~version": "CgMBAQA=",
            "owner": "alice",
            "value": 100,
        }));
        assert_eq!(doc.to_json(), json!({"owner": "alice", "value": 100}));
    }

    #[test]
    fn scalar_documents_are_kept_as_text() {
        assert_eq!(StoredValue::document(json!(42)).to_json(), json!("42"));
    }

    #[test]
    fn key_value_display_escapes_separators() {
        let kv = KeyValue::new("\u{0}asset\u{0}a1\u{0}", json!("x"));
        assert_eq!(kv.to_string(), "\\u{0}asset\\u{0}a1\\u{0}=\"x\"");
    }
}
