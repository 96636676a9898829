//! Tools the agent can call during a conversation turn.

use async_trait::async_trait;
use serde_json::Value;

pub mod knowledge;

pub use knowledge::KnowledgeLookupTool;

/// Declared interface of a tool, advertised to the model alongside the
/// conversation.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema for the tool input.
    pub input_schema: Value,
}

/// A callable capability. Implementations render their own failures into the
/// returned text; a tool call never fails the enclosing agent turn.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn invoke(&self, input: &Value) -> String;
}

/// Registered tools, dispatched by name in registration order.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<(ToolSpec, Box<dyn Tool>)>,
}

impl ToolSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.push((tool.spec(), Box::new(tool)));
    }

    /// Specs for every registered tool, in registration order.
    #[must_use]
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|(spec, _)| spec.clone()).collect()
    }

    /// Runs the named tool. An unknown name is reported back as text so the
    /// model can recover instead of the turn aborting.
    pub async fn dispatch(&self, name: &str, input: &Value) -> String {
        match self.tools.iter().find(|(spec, _)| spec.name == name) {
            Some((_, tool)) => tool.invoke(input).await,
            None => format!("Unknown tool: {name}"),
        }
    }
}
