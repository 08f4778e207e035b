//! Redaction of sensitive values before they reach logs, events or audit records.

use serde_json::{Map, Value};

/// Replacement written in place of a redacted value.
pub const REDACTED: &str = "[REDACTED]";

/// Key fragments that mark a tool argument as sensitive.
pub const ARGUMENT_SENSITIVE_KEYS: &[&str] = &[
    "password", "pass", "secret", "token", "key", "api_key", "apikey",
];

/// Key fragments that mark an audit detail as sensitive.
pub const DETAIL_SENSITIVE_KEYS: &[&str] = &[
    "password",
    "pass",
    "secret",
    "token",
    "key",
    "credentials",
    "api_key",
];

/// Redact tool arguments for observability payloads.
#[must_use]
pub fn redact_arguments(arguments: &Map<String, Value>) -> Map<String, Value> {
    redact_map(arguments, ARGUMENT_SENSITIVE_KEYS)
}

/// Redact audit details.
#[must_use]
pub fn redact_details(details: &Map<String, Value>) -> Map<String, Value> {
    redact_map(details, DETAIL_SENSITIVE_KEYS)
}

/// Redact every entry of `map` whose key contains one of `sensitive`
/// (case-insensitive), recursing into nested objects and arrays.
#[must_use]
pub fn redact_map(map: &Map<String, Value>, sensitive: &[&str]) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let redacted = if is_sensitive(key, sensitive) {
                Value::String(REDACTED.to_string())
            } else {
                redact_value(value, sensitive)
            };
            (key.clone(), redacted)
        })
        .collect()
}

fn redact_value(value: &Value, sensitive: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(redact_map(map, sensitive)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_value(item, sensitive))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_sensitive(key: &str, sensitive: &[&str]) -> bool {
    let lower = key.to_ascii_lowercase();
    sensitive.iter().any(|fragment| lower.contains(fragment))
}
