use std::env;

/// Region used when `REGION_NAME` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Model used when `MODEL_ID` is not set.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub region_name: String,
    pub model_id: String,
    pub knowledge_base_id: String,
    pub knowledge_base_data_source_id: String,
}

impl AppConfig {
    /// Reads configuration from the Lambda environment. Every variable has a
    /// default, so construction never fails; an unset knowledge base simply
    /// leaves the lookup tool unconfigured.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            region_name: env::var("REGION_NAME").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            model_id: env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            knowledge_base_id: env::var("KNOWLEDGE_BASE_ID").unwrap_or_default(),
            knowledge_base_data_source_id: env::var("KNOWLEDGE_BASE_DATA_SOURCE_ID")
                .unwrap_or_default(),
        }
    }

    /// True when both knowledge base identifiers are present.
    #[must_use]
    pub fn knowledge_base_configured(&self) -> bool {
        !self.knowledge_base_id.is_empty() && !self.knowledge_base_data_source_id.is_empty()
    }
}
