use aws_sdk_bedrockruntime::error::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("Failed to run agent conversation: {0}")]
    Agent(String),

    #[error("Failed to call the model service: {0}")]
    Model(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),

    #[error("Failed to serialize response: {0}")]
    Serialize(String),
}

impl From<anyhow::Error> for ChatApiError {
    fn from(error: anyhow::Error) -> Self {
        ChatApiError::Agent(error.to_string())
    }
}

impl From<serde_json::Error> for ChatApiError {
    fn from(error: serde_json::Error) -> Self {
        ChatApiError::Serialize(error.to_string())
    }
}

// Generic implementation for AWS SDK errors. DisplayErrorContext renders the
// full source chain, which the service error Display alone does not.
impl<E, R> From<SdkError<E, R>> for ChatApiError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        ChatApiError::Aws(format!("{}", DisplayErrorContext(&error)))
    }
}
