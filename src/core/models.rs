use serde::Serialize;
use serde_json::Value;

/// User id recorded when the request body does not carry one.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Validated chat request extracted from an API Gateway body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
}

impl ChatRequest {
    /// Pulls `message` and `user_id` out of a parsed request body. The error
    /// string is the client-facing validation message.
    pub fn from_body(body: &Value) -> Result<Self, &'static str> {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if message.is_empty() {
            return Err("Message field is required");
        }
        let user_id = body
            .get("user_id")
            .and_then(Value::as_str)
            .unwrap_or(ANONYMOUS_USER);
        Ok(Self {
            message: message.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub model: String,
    pub region: String,
    pub knowledge_base_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub user_id: String,
    pub model: String,
    pub knowledge_base_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// First hundred characters of `text`, for log lines that must not carry the
/// whole message.
#[must_use]
pub fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_body_reads_message_and_user() {
        let body = json!({"message": "Who is Harry Potter?", "user_id": "user-42"});
        let request = ChatRequest::from_body(&body).unwrap();
        assert_eq!(request.message, "Who is Harry Potter?");
        assert_eq!(request.user_id, "user-42");
    }

    #[test]
    fn test_from_body_defaults_missing_user_to_anonymous() {
        let body = json!({"message": "hello"});
        let request = ChatRequest::from_body(&body).unwrap();
        assert_eq!(request.user_id, ANONYMOUS_USER);
    }

    #[test]
    fn test_from_body_rejects_missing_or_empty_message() {
        for body in [json!({}), json!({"message": ""}), json!({"message": 42})] {
            let error = ChatRequest::from_body(&body).unwrap_err();
            assert_eq!(error, "Message field is required");
        }
    }

    #[test]
    fn test_from_body_rejects_non_object_bodies() {
        let error = ChatRequest::from_body(&json!(5)).unwrap_err();
        assert_eq!(error, "Message field is required");
    }

    #[test]
    fn test_responses_omit_timestamp_when_absent() {
        let health = HealthResponse {
            status: "healthy",
            message: "up",
            model: "model-id".to_string(),
            region: "us-east-1".to_string(),
            knowledge_base_configured: false,
            timestamp: None,
        };
        let value = serde_json::to_value(&health).unwrap();
        assert!(value.get("timestamp").is_none());

        let chat = ChatResponse {
            response: "hi".to_string(),
            user_id: "anonymous".to_string(),
            model: "model-id".to_string(),
            knowledge_base_enabled: true,
            timestamp: Some(2_500),
        };
        let value = serde_json::to_value(&chat).unwrap();
        assert_eq!(value["timestamp"], 2_500);
    }

    #[test]
    fn test_preview_truncates_at_one_hundred_characters() {
        let long = "x".repeat(250);
        assert_eq!(preview(&long).chars().count(), 100);
        assert_eq!(preview("short"), "short");
    }
}
