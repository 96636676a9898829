//! Extraction of response text from an agent result.
//!
//! Model backends disagree on the shape of a final message: most return a
//! list of typed content blocks, some a bare content string, and a few only a
//! pre-rendered string. [`AgentMessage`] names those shapes and
//! [`AgentResult::into_text`] collapses them in a fixed priority order, so the
//! chat endpoint always has a string to return.

use super::conversation::{Block, Message};

/// One element of a block-shaped message, reduced to the fields the
/// extraction looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPiece {
    /// Block type tag, when the backend provides one.
    pub kind: Option<String>,
    pub text: Option<String>,
}

/// The shapes a final message can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentMessage {
    /// A list of typed content blocks.
    Blocks(Vec<ContentPiece>),
    /// A bare content string.
    Content(String),
    /// The whole message is already a string.
    Plain(String),
}

/// Outcome of an agent run: the final message, if one was recognized, plus a
/// rendering of the whole result for the fallback path.
#[derive(Debug, Clone)]
pub struct AgentResult {
    message: Option<AgentMessage>,
    rendered: String,
}

impl AgentResult {
    #[must_use]
    pub fn new(message: Option<AgentMessage>, rendered: impl Into<String>) -> Self {
        Self {
            message,
            rendered: rendered.into(),
        }
    }

    /// Builds a result from a conversation message. Text blocks keep their
    /// text; other block kinds keep only their type tag.
    #[must_use]
    pub fn from_message(message: Message) -> Self {
        let rendered = format!("{message:?}");
        let pieces = message
            .content
            .into_iter()
            .map(|block| match block {
                Block::Text(text) => ContentPiece {
                    kind: Some("text".to_string()),
                    text: Some(text),
                },
                Block::ToolUse(_) => ContentPiece {
                    kind: Some("toolUse".to_string()),
                    text: None,
                },
                Block::ToolResult(_) => ContentPiece {
                    kind: Some("toolResult".to_string()),
                    text: None,
                },
                Block::Unknown(kind) => ContentPiece {
                    kind: Some(kind),
                    text: None,
                },
            })
            .collect();
        Self {
            message: Some(AgentMessage::Blocks(pieces)),
            rendered,
        }
    }

    /// Collapses the result to response text.
    ///
    /// Priority: text of the first block; empty string when the first block
    /// is tagged `text` but carries none; the content string; the plain
    /// message string; otherwise the rendered fallback. The fallback also
    /// covers a block list whose first element is not textual.
    #[must_use]
    pub fn into_text(self) -> String {
        match self.message {
            Some(AgentMessage::Blocks(pieces)) => {
                if let Some(first) = pieces.into_iter().next() {
                    if let Some(text) = first.text {
                        return text;
                    }
                    if first.kind.as_deref() == Some("text") {
                        return String::new();
                    }
                }
                self.rendered
            }
            Some(AgentMessage::Content(text) | AgentMessage::Plain(text)) => text,
            None => self.rendered,
        }
    }
}
