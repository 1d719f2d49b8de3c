//! ModelBackend trait definition.
//!
//! Every remote text-generation API the relay can talk to implements this.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use relaybot_types::error::GatewayError;
use relaybot_types::llm::{ModelReply, PromptRequest};

/// Trait for remote text-generation backends.
///
/// Implementations live in relaybot-infra (e.g., `ChatCompletionsBackend`).
/// A call to [`complete`](Self::complete) issues exactly one outbound request
/// and never retries.
pub trait ModelBackend: Send + Sync {
    /// Human-readable backend name (e.g., "chat_completions").
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Send the prompt and return the reply text.
    fn complete(
        &self,
        request: &PromptRequest,
    ) -> impl std::future::Future<Output = Result<ModelReply, GatewayError>> + Send;
}
