use serde_json::Value;

/// Render a claim value as a single printable line.
/// Strings are emitted without quotes; control characters are dropped.
pub fn value_to_string(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    raw.chars().filter(|c| !c.is_control()).collect()
}
