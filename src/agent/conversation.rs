//! Conversation state and the agent's tool-use loop.
//!
//! The agent drives a model backend through alternating turns: the model
//! either answers or requests tool calls, and tool outputs are fed back as
//! the next user turn until the model settles on an answer.

use async_trait::async_trait;
use tracing::info;

use super::result::AgentResult;
use crate::errors::ChatApiError;
use crate::tools::{ToolSet, ToolSpec};
use serde_json::Value;

/// Upper bound on model round trips within one request. A Lambda invocation
/// has a hard deadline, so a conversation that keeps requesting tools is cut
/// off rather than left to time out.
pub const MAX_MODEL_ROUNDS: usize = 8;

// ============================================================================
// Conversation types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseRequest {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// The output of a tool call, keyed back to the request id.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    ToolUse(ToolUseRequest),
    ToolResult(ToolOutcome),
    /// Content this service does not handle (images, documents). Carries the
    /// block's type tag for diagnostics.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Block>,
}

impl Message {
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Block::Text(text.into())],
        }
    }

    #[must_use]
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![Block::Text(text.into())],
        }
    }

    /// Tool invocations requested in this message, in order.
    #[must_use]
    pub fn tool_uses(&self) -> Vec<ToolUseRequest> {
        self.content
            .iter()
            .filter_map(|block| match block {
                Block::ToolUse(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopKind {
    EndTurn,
    ToolUse,
    /// Any other stop reason (`max_tokens`, content filters). Treated as a
    /// final answer.
    Other(String),
}

/// One model request: the full conversation so far plus the tool catalog.
#[derive(Debug, Clone)]
pub struct ConverseTurn<'a> {
    pub system_prompt: &'a str,
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
}

/// The model's reply to a [`ConverseTurn`].
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub message: Message,
    pub stop: StopKind,
}

/// Seam between the conversation loop and the model service.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn converse(&self, turn: ConverseTurn<'_>) -> Result<ModelReply, ChatApiError>;
}

// ============================================================================
// Agent loop
// ============================================================================

pub struct Agent {
    model: Box<dyn ModelBackend>,
    system_prompt: String,
    tools: ToolSet,
}

impl Agent {
    #[must_use]
    pub fn new(
        model: Box<dyn ModelBackend>,
        system_prompt: impl Into<String>,
        tools: ToolSet,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            tools,
        }
    }

    /// Runs one user message to completion, dispatching requested tools
    /// between model rounds.
    ///
    /// # Errors
    ///
    /// Fails when the backend fails or when the round limit is exhausted
    /// without a final answer. Tool failures do not surface here; tools
    /// render their own errors as result text.
    pub async fn run(&self, message: &str) -> Result<AgentResult, ChatApiError> {
        let specs = self.tools.specs();
        let mut messages = vec![Message::user_text(message)];

        for round in 0..MAX_MODEL_ROUNDS {
            let reply = self
                .model
                .converse(ConverseTurn {
                    system_prompt: &self.system_prompt,
                    messages: &messages,
                    tools: &specs,
                })
                .await?;

            let tool_uses = reply.message.tool_uses();
            if reply.stop == StopKind::ToolUse && !tool_uses.is_empty() {
                info!(round, count = tool_uses.len(), "Model requested tools");
                let mut results = Vec::with_capacity(tool_uses.len());
                for request in &tool_uses {
                    let output = self.tools.dispatch(&request.name, &request.input).await;
                    results.push(Block::ToolResult(ToolOutcome {
                        id: request.id.clone(),
                        content: output,
                    }));
                }
                messages.push(reply.message);
                messages.push(Message {
                    role: Role::User,
                    content: results,
                });
                continue;
            }

            return Ok(AgentResult::from_message(reply.message));
        }

        Err(ChatApiError::Agent(format!(
            "Exceeded {MAX_MODEL_ROUNDS} model rounds without a final answer"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed sequence of replies and records every turn it saw.
    struct ScriptedModel {
        replies: Mutex<VecDeque<ModelReply>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<ModelReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn turns(&self) -> Vec<Vec<Message>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelBackend for ScriptedModel {
        async fn converse(&self, turn: ConverseTurn<'_>) -> Result<ModelReply, ChatApiError> {
            self.seen.lock().unwrap().push(turn.messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ChatApiError::Model("script exhausted".to_string()))
        }
    }

    /// Lets a test keep a handle on the model after the agent takes the box.
    struct Shared(Arc<ScriptedModel>);

    #[async_trait]
    impl ModelBackend for Shared {
        async fn converse(&self, turn: ConverseTurn<'_>) -> Result<ModelReply, ChatApiError> {
            self.0.converse(turn).await
        }
    }

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "echo",
                description: "Echoes the query back.",
                input_schema: json!({ "type": "object" }),
            }
        }

        async fn invoke(&self, input: &Value) -> String {
            format!(
                "echo: {}",
                input.get("query").and_then(Value::as_str).unwrap_or_default()
            )
        }
    }

    fn tool_use_reply(name: &str) -> ModelReply {
        ModelReply {
            message: Message {
                role: Role::Assistant,
                content: vec![Block::ToolUse(ToolUseRequest {
                    id: "use-1".to_string(),
                    name: name.to_string(),
                    input: json!({ "query": "magic" }),
                })],
            },
            stop: StopKind::ToolUse,
        }
    }

    fn final_reply(text: &str) -> ModelReply {
        ModelReply {
            message: Message::assistant_text(text),
            stop: StopKind::EndTurn,
        }
    }

    fn agent_with(model: ScriptedModel, tools: ToolSet) -> Agent {
        Agent::new(Box::new(model), "You are helpful.", tools)
    }

    #[tokio::test]
    async fn test_returns_answer_on_end_turn() {
        let model = ScriptedModel::new(vec![final_reply("All done.")]);
        let agent = agent_with(model, ToolSet::new());
        let result = agent.run("hi").await.unwrap();
        assert_eq!(result.into_text(), "All done.");
    }

    #[tokio::test]
    async fn test_dispatches_tools_then_returns_final_answer() {
        let model = ScriptedModel::new(vec![tool_use_reply("echo"), final_reply("Answer.")]);
        let mut tools = ToolSet::new();
        tools.register(Echo);
        let agent = agent_with(model, tools);

        let result = agent.run("hi").await.unwrap();
        assert_eq!(result.into_text(), "Answer.");
    }

    #[tokio::test]
    async fn test_feeds_tool_output_back_as_a_user_turn() {
        let model = Arc::new(ScriptedModel::new(vec![
            tool_use_reply("echo"),
            final_reply("Answer."),
        ]));
        let mut tools = ToolSet::new();
        tools.register(Echo);
        let agent = Agent::new(Box::new(Shared(model.clone())), "You are helpful.", tools);
        agent.run("hi").await.unwrap();

        let turns = model.turns();
        assert_eq!(turns.len(), 2, "expected two model rounds");

        let second = &turns[1];
        assert_eq!(second.len(), 3, "user, assistant, tool results");
        assert_eq!(second[2].role, Role::User);
        assert_eq!(
            second[2].content[0],
            Block::ToolResult(ToolOutcome {
                id: "use-1".to_string(),
                content: "echo: magic".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_in_the_result_block() {
        let model = Arc::new(ScriptedModel::new(vec![
            tool_use_reply("missing"),
            final_reply("Recovered."),
        ]));
        let agent = Agent::new(
            Box::new(Shared(model.clone())),
            "You are helpful.",
            ToolSet::new(),
        );
        let result = agent.run("hi").await.unwrap();
        assert_eq!(result.into_text(), "Recovered.");

        let turns = model.turns();
        assert_eq!(
            turns[1][2].content[0],
            Block::ToolResult(ToolOutcome {
                id: "use-1".to_string(),
                content: "Unknown tool: missing".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_tool_use_stop_with_no_tool_blocks_is_final() {
        let reply = ModelReply {
            message: Message::assistant_text("Odd but final."),
            stop: StopKind::ToolUse,
        };
        let agent = agent_with(ScriptedModel::new(vec![reply]), ToolSet::new());
        let result = agent.run("hi").await.unwrap();
        assert_eq!(result.into_text(), "Odd but final.");
    }

    #[tokio::test]
    async fn test_round_limit_cuts_off_endless_tool_requests() {
        let mut tools = ToolSet::new();
        tools.register(Echo);
        let replies = (0..=MAX_MODEL_ROUNDS).map(|_| tool_use_reply("echo")).collect();
        let agent = agent_with(ScriptedModel::new(replies), tools);

        let error = agent.run("hi").await.unwrap_err();
        assert!(
            error.to_string().contains("model rounds"),
            "unexpected error: {error}"
        );
    }

    #[tokio::test]
    async fn test_backend_errors_propagate() {
        let agent = agent_with(ScriptedModel::new(Vec::new()), ToolSet::new());
        let error = agent.run("hi").await.unwrap_err();
        assert!(error.to_string().contains("script exhausted"));
    }
}
