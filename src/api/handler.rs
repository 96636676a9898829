//! Chat API Lambda handler - thin router over the health and chat endpoints.
//!
//! This module handles:
//! - Route matching on method and path (`GET /health`, `POST /chat`)
//! - Request body parsing and validation
//! - Delegation to the agent gateway for chat turns
//! - Mapping every outcome, including failures, onto a response envelope

use super::{envelope, parsing};
use crate::agent::AgentGateway;
use crate::core::models::{ChatRequest, ChatResponse, HealthResponse, preview};
use crate::errors::ChatApiError;
use chrono::Utc;
use lambda_runtime::{Context, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

const HEALTH_MESSAGE: &str = "Chat API is running with Claude integration via Bedrock";

/// Lambda handler for the chat API entrypoint.
///
/// Matches the route and dispatches to the endpoint handlers. Always resolves
/// to a proxy response envelope: routing misses become 404, validation
/// problems 400, and handler failures 500. The `Err` side of the signature is
/// never used, so the runtime never sees an invocation error for a request it
/// could deliver.
#[tracing::instrument(level = "info", skip(gateway, event))]
pub async fn function_handler(
    gateway: &AgentGateway,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let method = parsing::request_method(&event.payload).to_string();
    let path = parsing::request_path(&event.payload).to_string();
    info!(
        request_id = %event.context.request_id,
        %method,
        %path,
        "API Lambda received request"
    );

    let outcome = match (method.as_str(), path.as_str()) {
        ("GET", "/health") => health_check(gateway, &event.context),
        ("POST", "/chat") => handle_chat(gateway, &event.payload, &event.context).await,
        _ => Ok(envelope::not_found(&path, &method)),
    };

    match outcome {
        Ok(response) => Ok(response),
        Err(e) => {
            error!("Error processing request: {e}");
            Ok(envelope::internal_error(&e.to_string()))
        }
    }
}

// ============================================================================
// Health endpoint
// ============================================================================

/// Reports the configured model and region without touching AWS, so the check
/// stays fast and cannot fail on a cold start.
fn health_check(gateway: &AgentGateway, context: &Context) -> Result<Value, ChatApiError> {
    let config = gateway.config();
    let body = HealthResponse {
        status: "healthy",
        message: HEALTH_MESSAGE,
        model: config.model_id.clone(),
        region: config.region_name.clone(),
        knowledge_base_configured: config.knowledge_base_configured(),
        timestamp: remaining_time_ms(context),
    };
    Ok(envelope::ok(&serde_json::to_value(&body)?))
}

// ============================================================================
// Chat endpoint
// ============================================================================

async fn handle_chat(
    gateway: &AgentGateway,
    payload: &Value,
    context: &Context,
) -> Result<Value, ChatApiError> {
    let body = match chat_body(payload) {
        Ok(body) => body,
        Err(response) => return Ok(response),
    };

    let request = match ChatRequest::from_body(&body) {
        Ok(request) => request,
        Err(message) => {
            info!("Rejected chat request: {message}");
            return Ok(envelope::bad_request(message));
        }
    };

    info!(
        user_id = %request.user_id,
        "Chat request: {}",
        preview(&request.message)
    );

    let response = gateway.converse(&request.message).await;

    let config = gateway.config();
    let body = ChatResponse {
        response,
        user_id: request.user_id,
        model: config.model_id.clone(),
        knowledge_base_enabled: config.knowledge_base_configured(),
        timestamp: remaining_time_ms(context),
    };
    Ok(envelope::ok(&serde_json::to_value(&body)?))
}

/// Extracts the request body as parsed JSON. API Gateway delivers the body as
/// a string; direct invocations may inline an object. Anything else is
/// treated as an absent body, which fails the message-field check downstream.
fn chat_body(payload: &Value) -> Result<Value, Value> {
    match payload.get("body") {
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|e| {
            info!("Request body is not valid JSON: {e}");
            envelope::bad_request("Invalid JSON in request body")
        }),
        Some(body @ Value::Object(_)) => Ok(body.clone()),
        _ => Ok(Value::Object(serde_json::Map::new())),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Milliseconds left before the invocation deadline. `None` outside a real
/// Lambda environment, where the context carries no deadline.
fn remaining_time_ms(context: &Context) -> Option<i64> {
    if context.deadline == 0 {
        return None;
    }
    let deadline = i64::try_from(context.deadline).ok()?;
    Some((deadline - Utc::now().timestamp_millis()).max(0))
}
