//! Lazy gateway between the HTTP handlers and the agent stack.
//!
//! The gateway is constructed once per Lambda process with plain
//! configuration. The underlying agent (AWS shared config, Bedrock client,
//! tool registrations) is built on the first chat request and memoized, so
//! cold starts pay for it once and the health endpoint never pays at all.

use tokio::sync::OnceCell;
use tracing::{error, info};

use super::bedrock::BedrockModel;
use super::conversation::Agent;
use crate::core::config::AppConfig;
use crate::errors::ChatApiError;
use crate::tools::{KnowledgeLookupTool, ToolSet};

#[cfg(not(feature = "debug-logs"))]
use crate::core::models::preview;

pub const SYSTEM_PROMPT: &str = "You are a helpful, friendly, and knowledgeable AI assistant. \
     You provide accurate, thoughtful answers and admit when you are unsure. When the knowledge \
     base search tool is available, use it to look up relevant information before answering \
     questions about its subject matter.";

pub struct AgentGateway {
    config: AppConfig,
    agent: OnceCell<Agent>,
}

impl AgentGateway {
    /// A gateway that will connect to AWS on first use.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            agent: OnceCell::new(),
        }
    }

    /// A gateway around an already-built agent. Used by tests to substitute
    /// the model backend.
    #[must_use]
    pub fn with_agent(config: AppConfig, agent: Agent) -> Self {
        Self {
            config,
            agent: OnceCell::new_with(Some(agent)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether the agent stack has been built yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.agent.initialized()
    }

    async fn agent(&self) -> Result<&Agent, ChatApiError> {
        self.agent
            .get_or_try_init(|| async { connect(&self.config).await })
            .await
    }

    /// Runs one chat turn. Infallible by contract: any failure comes back as
    /// an apology message so the endpoint still returns a well-formed body.
    pub async fn converse(&self, message: &str) -> String {
        match self.try_converse(message).await {
            Ok(text) => text,
            Err(e) => {
                error!("Agent conversation failed: {e}");
                apology(&e.to_string())
            }
        }
    }

    async fn try_converse(&self, message: &str) -> Result<String, ChatApiError> {
        let agent = self.agent().await?;

        #[cfg(feature = "debug-logs")]
        info!("Sending message to agent: {message}");
        #[cfg(not(feature = "debug-logs"))]
        info!("Sending message to agent: {}", preview(message));

        let result = agent.run(message).await?;
        Ok(result.into_text())
    }
}

/// Builds the full agent stack: shared AWS config for the configured region,
/// the Bedrock Converse backend, and the tool catalog.
async fn connect(config: &AppConfig) -> Result<Agent, ChatApiError> {
    info!(
        region = %config.region_name,
        model_id = %config.model_id,
        knowledge_base = config.knowledge_base_configured(),
        "Initializing agent stack"
    );

    let shared_config = aws_config::from_env()
        .region(aws_config::Region::new(config.region_name.clone()))
        .load()
        .await;

    let model = BedrockModel::new(&shared_config, config.model_id.as_str());

    // The lookup tool is always in the catalog; it degrades to a textual
    // notice when the knowledge base identifiers are absent.
    let mut tools = ToolSet::new();
    tools.register(KnowledgeLookupTool::new(&shared_config, config));

    Ok(Agent::new(Box::new(model), SYSTEM_PROMPT, tools))
}

fn apology(description: &str) -> String {
    format!(
        "I apologize, but I encountered an error while processing your request: {description}. \
         Please try again."
    )
}
