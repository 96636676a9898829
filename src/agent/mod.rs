//! Conversational agent: model backend seam, tool loop, and the gateway the
//! API handlers talk to.

pub mod bedrock;
pub mod conversation;
pub mod gateway;
pub mod result;

pub use bedrock::BedrockModel;
pub use conversation::{
    Agent, Block, ConverseTurn, MAX_MODEL_ROUNDS, Message, ModelBackend, ModelReply, Role,
    StopKind, ToolOutcome, ToolUseRequest,
};
pub use gateway::{AgentGateway, SYSTEM_PROMPT};
pub use result::{AgentMessage, AgentResult, ContentPiece};
