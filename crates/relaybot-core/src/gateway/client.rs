//! ModelClient -- the gateway operation the router calls.
//!
//! Wraps a [`BoxModelBackend`] with the parts every backend shares: input
//! validation, prompt assembly, a hard deadline on the call, and a check
//! that the reply actually carries text.

use std::time::{Duration, Instant};

use tracing::{Instrument, debug, info_span};

use relaybot_types::chat::Turn;
use relaybot_types::error::GatewayError;
use relaybot_types::llm::ModelReply;

use super::box_backend::BoxModelBackend;
use super::prompt::build_prompt;

/// Issues one bounded model call per answer.
#[derive(Debug)]
pub struct ModelClient {
    backend: BoxModelBackend,
    request_timeout: Duration,
    system_prompt: Option<String>,
}

impl ModelClient {
    pub fn new(backend: BoxModelBackend, request_timeout: Duration) -> Self {
        Self {
            backend,
            request_timeout,
            system_prompt: None,
        }
    }

    /// Prepend a fixed system instruction to every prompt.
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn backend(&self) -> &BoxModelBackend {
        &self.backend
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Ask the model to answer `new_message` given the chat's `history`.
    ///
    /// Exactly one backend call is made (none if the message is blank). The
    /// call is abandoned after the configured timeout and reported as
    /// [`GatewayError::Timeout`].
    pub async fn generate(
        &self,
        history: &[Turn],
        new_message: &str,
    ) -> Result<ModelReply, GatewayError> {
        let new_message = new_message.trim();
        if new_message.is_empty() {
            return Err(GatewayError::InvalidInput(
                "message is empty after trimming".to_string(),
            ));
        }

        let request = build_prompt(self.system_prompt.as_deref(), history, new_message);

        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.backend.name(),
            gen_ai.request.model = %self.backend.model(),
            history_len = history.len(),
        );

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.request_timeout, self.backend.complete(&request))
            .instrument(span)
            .await;

        let reply = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(GatewayError::Timeout(self.request_timeout)),
        };

        if reply.text.trim().is_empty() {
            return Err(GatewayError::MalformedResponse(
                "reply text is empty".to_string(),
            ));
        }

        debug!(
            backend = self.backend.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = reply.text.chars().count(),
            "model call completed"
        );
        Ok(reply)
    }
}
