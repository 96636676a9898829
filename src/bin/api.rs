pub use chat_api::api::handler;

use chat_api::agent::AgentGateway;
use chat_api::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    chat_api::setup_logging();

    // One gateway per process; warm invocations reuse the memoized agent.
    let gateway = AgentGateway::new(AppConfig::from_env());
    let gateway_ref = &gateway;

    lambda_runtime::run(lambda_runtime::service_fn(move |event| async move {
        handler(gateway_ref, event).await
    }))
    .await
}
