//! Chat API - a serverless chat endpoint backed by a Bedrock agent.
//!
//! This crate implements a single API Lambda:
//! 1. A router that maps API Gateway events to `GET /health` and `POST /chat`
//! 2. An agent gateway that holds a lazily-built Bedrock Converse agent with
//!    an optional knowledge base lookup tool
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - Bedrock Runtime (Converse) for model calls
//! - Bedrock Agent Runtime (Retrieve) for knowledge base lookups
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use chat_api::agent::AgentGateway;
//! use chat_api::core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Set up structured logging
//!     chat_api::setup_logging();
//!
//!     // Configuration comes from the Lambda environment; everything has a
//!     // default, so this also works locally.
//!     let gateway = AgentGateway::new(AppConfig::from_env());
//!
//!     let reply = gateway.converse("Who is Harry Potter?").await;
//!     println!("{reply}");
//! }
//! ```

// Module declarations
pub mod agent;
pub mod api;
pub mod core;
pub mod errors;
pub mod tools;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called at the start of each Lambda
/// handler.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// chat_api::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
