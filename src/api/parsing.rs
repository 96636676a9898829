//! Probing helpers for raw API Gateway events.
//!
//! The handler accepts the event as untyped JSON because the REST (v1) and
//! HTTP (v2) payload formats spell the method and path differently.

use serde_json::Value;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method, from the v1 field with a fallback to the v2 request context.
#[must_use]
pub fn request_method(payload: &Value) -> &str {
    payload
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| v_str(payload, &["requestContext", "http", "method"]))
        .unwrap_or_default()
}

/// Request path, from the v1 field with a fallback to the v2 `rawPath`.
#[must_use]
pub fn request_path(payload: &Value) -> &str {
    payload
        .get("path")
        .and_then(Value::as_str)
        .or_else(|| payload.get("rawPath").and_then(Value::as_str))
        .unwrap_or_default()
}
