use std::collections::HashSet;

use serde_json::Value;

/// Replacement written over every sensitive value.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Recursively overwrite the value of every object key in `sensitive`,
/// at any depth and through any array nesting. Key comparison is
/// case-sensitive. The whole value is replaced, scalar or structured.
pub fn redact_in_place(value: &mut Value, sensitive: &HashSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if sensitive.contains(key) {
                    *entry = Value::String(REDACTION_MARKER.to_string());
                } else {
                    redact_in_place(entry, sensitive);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact_in_place(item, sensitive);
            }
        }
        _ => {}
    }
}
