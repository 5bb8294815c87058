//! Record literals for formatter and transport tests.

use serde_json::{Map, Value};

/// Unwrap a `json!({...})` literal into a record map.
///
/// # Panics
///
/// Panics when `value` is not a JSON object.
#[must_use]
pub fn record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_literals_keep_field_order() {
        let fields = record(json!({"b": 1, "a": 2}));
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
