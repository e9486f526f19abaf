//! Decoded form payloads.

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Field name → value, as decoded from the request body.
pub type FormPayload = Map<String, Value>;

/// Whether a field carries anything a human would have typed.
///
/// Null, blank strings, and empty arrays/objects count as empty.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Field names only. Used for logging; values never leave here.
pub fn field_names(payload: &FormPayload) -> Vec<&str> {
    payload.keys().map(String::as_str).collect()
}

/// Build a payload from decoded key/value pairs.
///
/// A key seen more than once becomes a single field holding an array of its
/// values, so the field count is the number of distinct names.
pub fn from_pairs<I, K, V>(pairs: I) -> FormPayload
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut payload = FormPayload::new();
    for (key, value) in pairs {
        let value = Value::String(value.into());
        match payload.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_values_are_not_filled() {
        assert!(!is_filled(&json!(null)));
        assert!(!is_filled(&json!("")));
        assert!(!is_filled(&json!("   ")));
        assert!(!is_filled(&json!([])));
        assert!(!is_filled(&json!({})));

        assert!(is_filled(&json!("https://spam.example")));
        assert!(is_filled(&json!(0)));
        assert!(is_filled(&json!(false)));
        assert!(is_filled(&json!([""])));
    }

    #[test]
    fn repeated_keys_collapse_into_one_field() {
        let payload = from_pairs([
            ("name", "Ada"),
            ("interest", "hosting"),
            ("interest", "events"),
            ("interest", "press"),
        ]);

        assert_eq!(payload.len(), 2);
        assert_eq!(payload["name"], json!("Ada"));
        assert_eq!(payload["interest"], json!(["hosting", "events", "press"]));
        let mut names = field_names(&payload);
        names.sort_unstable();
        assert_eq!(names, vec!["interest", "name"]);
    }
}
