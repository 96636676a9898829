//! Bedrock Runtime backend for the conversation loop.
//!
//! Uses the non-streaming Converse API: a Lambda proxy response is returned
//! as one document, so there is nothing to stream to.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, Message as BedrockMessage, StopReason, SystemContentBlock,
    Tool as BedrockTool, ToolConfiguration, ToolInputSchema, ToolResultBlock,
    ToolResultContentBlock, ToolSpecification, ToolUseBlock,
};
use aws_smithy_types::{Document, Number};
use serde_json::Value;
use tracing::debug;

use super::conversation::{
    Block, ConverseTurn, Message, ModelBackend, ModelReply, Role, StopKind, ToolUseRequest,
};
use crate::errors::ChatApiError;
use crate::tools::ToolSpec;

pub struct BedrockModel {
    client: Client,
    model_id: String,
}

impl BedrockModel {
    #[must_use]
    pub fn new(shared_config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(shared_config),
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ModelBackend for BedrockModel {
    async fn converse(&self, turn: ConverseTurn<'_>) -> Result<ModelReply, ChatApiError> {
        debug!(
            model_id = %self.model_id,
            messages = turn.messages.len(),
            tools = turn.tools.len(),
            "Sending Converse request"
        );

        let mut call = self
            .client
            .converse()
            .model_id(self.model_id.as_str())
            .system(SystemContentBlock::Text(turn.system_prompt.to_string()));
        for message in turn.messages {
            call = call.messages(to_bedrock_message(message)?);
        }
        if !turn.tools.is_empty() {
            call = call.tool_config(to_tool_configuration(turn.tools)?);
        }

        let response = call.send().await?;

        let stop = match response.stop_reason() {
            StopReason::ToolUse => StopKind::ToolUse,
            StopReason::EndTurn => StopKind::EndTurn,
            other => StopKind::Other(other.as_str().to_string()),
        };
        let message = response
            .output()
            .and_then(|output| output.as_message().ok())
            .map(from_bedrock_message)
            .ok_or_else(|| {
                ChatApiError::Model("Converse response contained no output message".to_string())
            })?;

        Ok(ModelReply { message, stop })
    }
}

// ============================================================================
// Wire conversions
// ============================================================================

fn to_bedrock_message(message: &Message) -> Result<BedrockMessage, ChatApiError> {
    let role = match message.role {
        Role::User => ConversationRole::User,
        Role::Assistant => ConversationRole::Assistant,
    };
    let mut builder = BedrockMessage::builder().role(role);
    for block in &message.content {
        if let Some(converted) = to_bedrock_block(block)? {
            builder = builder.content(converted);
        }
    }
    builder
        .build()
        .map_err(|e| ChatApiError::Model(format!("Failed to build model message: {e}")))
}

/// `Ok(None)` for blocks with no wire form; unknown blocks are display-only
/// and must not be echoed back to the service.
fn to_bedrock_block(block: &Block) -> Result<Option<ContentBlock>, ChatApiError> {
    match block {
        Block::Text(text) => Ok(Some(ContentBlock::Text(text.clone()))),
        Block::ToolUse(request) => {
            let built = ToolUseBlock::builder()
                .tool_use_id(request.id.as_str())
                .name(request.name.as_str())
                .input(value_to_document(&request.input))
                .build()
                .map_err(|e| ChatApiError::Model(format!("Failed to build tool use block: {e}")))?;
            Ok(Some(ContentBlock::ToolUse(built)))
        }
        Block::ToolResult(outcome) => {
            let built = ToolResultBlock::builder()
                .tool_use_id(outcome.id.as_str())
                .content(ToolResultContentBlock::Text(outcome.content.clone()))
                .build()
                .map_err(|e| {
                    ChatApiError::Model(format!("Failed to build tool result block: {e}"))
                })?;
            Ok(Some(ContentBlock::ToolResult(built)))
        }
        Block::Unknown(_) => Ok(None),
    }
}

fn from_bedrock_message(message: &BedrockMessage) -> Message {
    let role = match message.role() {
        ConversationRole::Assistant => Role::Assistant,
        _ => Role::User,
    };
    let content = message.content().iter().map(from_bedrock_block).collect();
    Message { role, content }
}

fn from_bedrock_block(block: &ContentBlock) -> Block {
    match block {
        ContentBlock::Text(text) => Block::Text(text.clone()),
        ContentBlock::ToolUse(request) => Block::ToolUse(ToolUseRequest {
            id: request.tool_use_id().to_string(),
            name: request.name().to_string(),
            input: document_to_value(request.input()),
        }),
        other => Block::Unknown(block_tag(other)),
    }
}

/// Type tag for a content block variant this service does not model.
fn block_tag(block: &ContentBlock) -> String {
    let rendered = format!("{block:?}");
    rendered
        .split(['(', '{', ' '])
        .next()
        .unwrap_or("Unknown")
        .to_string()
}

fn to_tool_configuration(specs: &[ToolSpec]) -> Result<ToolConfiguration, ChatApiError> {
    let mut builder = ToolConfiguration::builder();
    for spec in specs {
        let specification = ToolSpecification::builder()
            .name(spec.name)
            .description(spec.description)
            .input_schema(ToolInputSchema::Json(value_to_document(&spec.input_schema)))
            .build()
            .map_err(|e| {
                ChatApiError::Model(format!("Failed to build tool specification: {e}"))
            })?;
        builder = builder.tools(BedrockTool::ToolSpec(specification));
    }
    builder
        .build()
        .map_err(|e| ChatApiError::Model(format!("Failed to build tool configuration: {e}")))
}

fn value_to_document(value: &Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(flag) => Document::Bool(*flag),
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                Document::Number(Number::PosInt(unsigned))
            } else if let Some(signed) = number.as_i64() {
                Document::Number(Number::NegInt(signed))
            } else {
                Document::Number(Number::Float(number.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(text) => Document::String(text.clone()),
        Value::Array(items) => Document::Array(items.iter().map(value_to_document).collect()),
        Value::Object(map) => Document::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), value_to_document(item)))
                .collect(),
        ),
    }
}

fn document_to_value(document: &Document) -> Value {
    match document {
        Document::Null => Value::Null,
        Document::Bool(flag) => Value::Bool(*flag),
        Document::Number(Number::PosInt(unsigned)) => Value::from(*unsigned),
        Document::Number(Number::NegInt(signed)) => Value::from(*signed),
        Document::Number(Number::Float(float)) => {
            serde_json::Number::from_f64(*float).map_or(Value::Null, Value::Number)
        }
        Document::String(text) => Value::String(text.clone()),
        Document::Array(items) => Value::Array(items.iter().map(document_to_value).collect()),
        Document::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), document_to_value(item)))
                .collect(),
        ),
    }
}
