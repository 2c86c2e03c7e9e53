//! # Documents
//!
//! A document is a JSON object stored under `(collection, id)`. The id is
//! not part of the stored object; [`Document::decode`] injects it as `"id"`
//! so domain records with an `id` field round-trip cleanly.
//!
//! The helpers here are shared by both store implementations so the
//! in-memory fake and SQLite agree on merge and match semantics.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Document {
            id: id.into(),
            data,
        }
    }

    /// Deserializes the document into a record, exposing the key as `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut data = self.data.clone();
        if let Value::Object(map) = &mut data {
            map.entry("id")
                .or_insert_with(|| Value::String(self.id.clone()));
        }
        Ok(serde_json::from_value(data)?)
    }

    /// Top-level field lookup.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Serializes a record into storable document data.
///
/// The `id` field, if present, is dropped since it is the document key.
pub fn to_data<T: Serialize>(record: &T) -> StoreResult<Value> {
    let mut value = serde_json::to_value(record)?;
    match &mut value {
        Value::Object(map) => {
            map.remove("id");
        }
        _ => {
            return Err(StoreError::Serialization(
                "documents must be JSON objects".to_string(),
            ))
        }
    }
    Ok(value)
}

/// Checks that a value can be stored as a document body.
pub(crate) fn ensure_object(data: &Value) -> StoreResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::Serialization(
            "documents must be JSON objects".to_string(),
        ))
    }
}

/// Field names are plain identifiers; they end up inside a JSON path.
pub(crate) fn validate_field_name(field: &str) -> StoreResult<()> {
    let ok = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

/// Shallow merge: top-level keys of `patch` replace those of `target`.
pub(crate) fn merge_shallow(target: &mut Value, patch: &Value) -> StoreResult<()> {
    let patch = patch.as_object().ok_or_else(|| {
        StoreError::Serialization("update data must be a JSON object".to_string())
    })?;
    let target = match target {
        Value::Object(map) => map,
        _ => {
            return Err(StoreError::Serialization(
                "stored document is not a JSON object".to_string(),
            ))
        }
    };
    for (k, v) in patch {
        target.insert(k.clone(), v.clone());
    }
    Ok(())
}

/// Equality on a top-level field. `null` never matches, so a missing field
/// and an explicit null behave the same.
pub(crate) fn field_matches(data: &Value, field: &str, expected: &Value) -> bool {
    if expected.is_null() {
        return false;
    }
    match data.get(field) {
        Some(actual) => json_eq(actual, expected),
        None => false,
    }
}

/// Guard check for `WriteOp::Expect`: `None` requires the field to be absent.
pub(crate) fn field_state_matches(data: &Value, field: &str, expected: Option<&Value>) -> bool {
    match expected {
        Some(value) => field_matches(data, field, value),
        None => data.get(field).is_none(),
    }
}

/// Value equality that treats `1` and `1.0` alike.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        name: String,
    }

    #[test]
    fn test_decode_injects_id() {
        let doc = Document::new("t-1", json!({"name": "bike"}));
        let thing: Thing = doc.decode().unwrap();
        assert_eq!(thing.id, "t-1");
        assert_eq!(thing.name, "bike");
    }

    #[test]
    fn test_to_data_strips_id() {
        let data = to_data(&Thing {
            id: "t-1".to_string(),
            name: "bike".to_string(),
        })
        .unwrap();
        assert_eq!(data, json!({"name": "bike"}));
        assert!(to_data(&5).is_err());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut target = json!({"a": 1, "nested": {"x": 1, "y": 2}});
        merge_shallow(&mut target, &json!({"nested": {"x": 9}, "b": true})).unwrap();
        assert_eq!(target, json!({"a": 1, "nested": {"x": 9}, "b": true}));
    }

    #[test]
    fn test_field_matches() {
        let data = json!({"status": "Pending", "rated": false, "score": 4});
        assert!(field_matches(&data, "status", &json!("Pending")));
        assert!(field_matches(&data, "rated", &json!(false)));
        assert!(field_matches(&data, "score", &json!(4.0)));
        assert!(!field_matches(&data, "status", &json!("Complete")));
        assert!(!field_matches(&data, "missing", &Value::Null));
    }

    #[test]
    fn test_field_state_matches_absence() {
        let data = json!({"status": "Complete"});
        assert!(field_state_matches(&data, "rated", None));
        assert!(!field_state_matches(&data, "status", None));
        assert!(!field_state_matches(&data, "rated", Some(&json!(false))));
        assert!(field_state_matches(&data, "status", Some(&json!("Complete"))));
    }

    #[test]
    fn test_field_names() {
        assert!(validate_field_name("target_id").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("a.b").is_err());
        assert!(validate_field_name("x') OR 1=1 --").is_err());
    }
}
