//! Knowledge base lookup backed by Bedrock Agent Runtime `Retrieve`.
//!
//! The tool is always registered so the model can discover it; when the
//! knowledge base identifiers are absent it answers with a fixed notice
//! instead of calling AWS. Failures and empty result sets likewise come back
//! as text that steers the model toward its general knowledge.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration, KnowledgeBaseRetrievalResult,
    KnowledgeBaseVectorSearchConfiguration,
};
use aws_smithy_types::Document;
use serde_json::{Value, json};
use tracing::{error, info};

use super::{Tool, ToolSpec};
use crate::core::config::AppConfig;
use crate::errors::ChatApiError;

/// Passages requested per query.
const RESULT_COUNT: i32 = 5;

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

pub const NOT_CONFIGURED_NOTICE: &str = "Knowledge base is not configured. Set KNOWLEDGE_BASE_ID \
     and KNOWLEDGE_BASE_DATA_SOURCE_ID to enable knowledge lookups.";

pub const NO_RESULTS_NOTICE: &str =
    "No information found in the knowledge base for this query. Falling back to general knowledge.";

pub const EMPTY_QUERY_NOTICE: &str =
    "Knowledge base lookup needs a non-empty query. Falling back to general knowledge.";

pub struct KnowledgeLookupTool {
    client: Client,
    knowledge_base_id: String,
    data_source_id: String,
}

/// One retrieved passage, reduced to the fields rendered for the model.
struct Passage {
    source: String,
    title: String,
    text: String,
}

impl KnowledgeLookupTool {
    #[must_use]
    pub fn new(shared_config: &aws_config::SdkConfig, config: &AppConfig) -> Self {
        Self {
            client: Client::new(shared_config),
            knowledge_base_id: config.knowledge_base_id.clone(),
            data_source_id: config.knowledge_base_data_source_id.clone(),
        }
    }

    fn configured(&self) -> bool {
        !self.knowledge_base_id.is_empty() && !self.data_source_id.is_empty()
    }

    /// Runs a retrieval query and renders the passages as model-readable
    /// text. Never returns an error; every failure mode has a textual shape.
    pub async fn search(&self, query: &str) -> String {
        if !self.configured() {
            info!("Knowledge base lookup requested but identifiers are not set");
            return NOT_CONFIGURED_NOTICE.to_string();
        }
        if query.trim().is_empty() {
            return EMPTY_QUERY_NOTICE.to_string();
        }

        match self.retrieve(query).await {
            Ok(passages) if passages.is_empty() => {
                info!("Knowledge base returned no results: {query}");
                NO_RESULTS_NOTICE.to_string()
            }
            Ok(passages) => {
                info!(
                    count = passages.len(),
                    "Knowledge base returned passages: {query}"
                );
                format_passages(&passages)
            }
            Err(e) => {
                error!("Knowledge base retrieval failed: {e}");
                format!(
                    "Error searching the knowledge base: {e}. Falling back to general knowledge."
                )
            }
        }
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<Passage>, ChatApiError> {
        let retrieval_query = KnowledgeBaseQuery::builder().text(query).build();

        let vector_search = KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(RESULT_COUNT)
            .build();

        let retrieval_configuration = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_search)
            .build();

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(self.knowledge_base_id.as_str())
            .retrieval_query(retrieval_query)
            .retrieval_configuration(retrieval_configuration)
            .send()
            .await?;

        Ok(response.retrieval_results().iter().map(to_passage).collect())
    }
}

#[async_trait]
impl Tool for KnowledgeLookupTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "search_knowledge_base",
            description: "Search the configured knowledge base for passages relevant to the \
                 user's question. Use this before answering questions about the knowledge base \
                 subject matter.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn invoke(&self, input: &Value) -> String {
        let query = input.get("query").and_then(Value::as_str).unwrap_or_default();
        self.search(query).await
    }
}

fn to_passage(result: &KnowledgeBaseRetrievalResult) -> Passage {
    let metadata = result.metadata();
    let source = metadata
        .and_then(|m| document_str(m.get("source")))
        .or_else(|| {
            result
                .location()
                .and_then(|location| location.s3_location())
                .and_then(|s3| s3.uri())
        })
        .unwrap_or("Unknown source");
    let title = metadata
        .and_then(|m| document_str(m.get("title")))
        .unwrap_or("Untitled");
    let text = result
        .content()
        .map(|content| content.text())
        .unwrap_or_default();

    Passage {
        source: source.to_string(),
        title: title.to_string(),
        text: text.to_string(),
    }
}

fn document_str(document: Option<&Document>) -> Option<&str> {
    match document {
        Some(Document::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| {
            format!(
                "Source: {}\nTitle: {}\nContent: {}",
                p.source, p.title, p.text
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
