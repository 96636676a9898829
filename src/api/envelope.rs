//! Response envelope builders for the API Gateway proxy contract.
//!
//! Every response carries the same CORS headers and a JSON body serialized
//! to a string, per the proxy integration format.

use once_cell::sync::Lazy;
use serde_json::{Value, json};

/// Headers attached to every response. Preflight OPTIONS is answered by the
/// gateway itself; these cover the proxied responses.
static CORS_HEADERS: Lazy<Value> = Lazy::new(|| {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Headers": "Content-Type",
        "Access-Control-Allow-Methods": "POST, GET, OPTIONS"
    })
});

/// Wraps `body` in a proxy response envelope with the given status code.
#[must_use]
pub fn envelope(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": CORS_HEADERS.clone(),
        "body": body.to_string()
    })
}

/// Returns a 200 OK response with the given JSON body.
#[must_use]
pub fn ok(body: &Value) -> Value {
    envelope(200, body)
}

/// Returns a 400 response for a client-side request problem.
#[must_use]
pub fn bad_request(message: &str) -> Value {
    envelope(
        400,
        &json!({ "error": "Bad request", "message": message }),
    )
}

/// Returns a 404 response naming the unmatched route.
#[must_use]
pub fn not_found(path: &str, method: &str) -> Value {
    envelope(
        404,
        &json!({
            "error": "Endpoint not found",
            "message": format!("Path {path} with method {method} is not supported")
        }),
    )
}

/// Returns a 500 response with a failure description.
#[must_use]
pub fn internal_error(message: &str) -> Value {
    envelope(
        500,
        &json!({ "error": "Internal server error", "message": message }),
    )
}
