use serde_json::Value as JsonValue;

/// Maps form input to the value that gets bound.
///
/// An empty string and an explicit null both become SQL NULL. This is the
/// only implicit coercion the engine performs, and it applies to every column
/// whether or not the column is nullable.
pub fn normalize_input(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => JsonValue::Null,
        JsonValue::String(s) if s.is_empty() => JsonValue::Null,
        other => other.clone(),
    }
}

pub fn normalize_inputs(values: &[JsonValue]) -> Vec<JsonValue> {
    values.iter().map(normalize_input).collect()
}
