//! Response normalization
//!
//! The content backend hands out records in two shapes: wrapped
//! (`{ id, attributes: { .. } }`) and flat (`{ id, .. }`). Both collapse to a
//! [`ContentRecord`] here, and nothing downstream looks at the shape again.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

pub const WRAPPER_FIELD: &str = "attributes";
pub const ENVELOPE_FIELD: &str = "data";

/// Flat record with a string id, whatever the source shape was.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    One(ContentRecord),
    Many(Vec<ContentRecord>),
}

impl Normalized {
    pub fn into_vec(self) -> Vec<ContentRecord> {
        match self { Self::One(r) => vec![r], Self::Many(rs) => rs }
    }
}

impl ContentRecord {
    /// Field value, with JSON `null` treated as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.str(key).unwrap_or(default).to_string()
    }

    /// Non-negative integer, accepting numbers and numeric strings.
    pub fn u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f.round() as u64),
            _ => None,
        }
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Array field, looking through a `{ data: [..] }` relation envelope.
    pub fn array(&self, key: &str) -> &[Value] {
        match self.get(key).map(strip_envelope) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// Related object, looking through a `{ data: { .. } }` relation envelope.
    pub fn relation(&self, key: &str) -> Option<ContentRecord> {
        let inner = strip_envelope(self.get(key)?);
        inner.is_object().then(|| normalize_item(inner))
    }
}

/// Normalize a single record or an array of records.
pub fn normalize(raw: &Value) -> Normalized {
    match raw {
        Value::Array(items) => Normalized::Many(items.iter().map(normalize_item).collect()),
        other => Normalized::One(normalize_item(other)),
    }
}

/// Like [`normalize`], after stripping a top-level `{ data: .. }` response envelope.
pub fn normalize_response(raw: &Value) -> Normalized {
    normalize(strip_envelope(raw))
}

/// An object is an envelope when it carries `data` but no `id` of its own.
pub fn strip_envelope(raw: &Value) -> &Value {
    match raw {
        Value::Object(map) if !map.contains_key("id") => match map.get(ENVELOPE_FIELD) {
            Some(inner) if inner.is_array() || inner.is_object() => inner,
            _ => raw,
        },
        _ => raw,
    }
}

pub fn normalize_item(raw: &Value) -> ContentRecord {
    let Value::Object(map) = raw else {
        return ContentRecord::default();
    };

    let id = coerce_id(map.get("id"));
    if id.is_empty() {
        debug!(keys = map.len(), "content record has no discoverable id");
    }

    let fields = match map.get(WRAPPER_FIELD) {
        Some(Value::Object(attributes)) => attributes.clone(),
        _ => map.iter().filter(|(k, _)| k.as_str() != "id").map(|(k, v)| (k.clone(), v.clone())).collect(),
    };

    ContentRecord { id, fields }
}

fn coerce_id(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
