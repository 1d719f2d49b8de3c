//! ChatCompletionsBackend -- [`ModelBackend`] for OpenAI-style
//! `POST /chat/completions` endpoints.
//!
//! Works with any server speaking that shape (OpenAI, OpenRouter, vLLM,
//! LM Studio, ...). The API key is wrapped in [`SecretString`] and only
//! exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use relaybot_core::gateway::ModelBackend;
use relaybot_types::error::GatewayError;
use relaybot_types::llm::{ModelReply, PromptRequest};

use super::types::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse};
use super::{classify_reqwest_error, http_client, read_json, require_text};

/// Chat-completions model backend.
pub struct ChatCompletionsBackend {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    timeout: Duration,
}

impl ChatCompletionsBackend {
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model,
            max_tokens: None,
            temperature: None,
            timeout,
        })
    }

    /// Override the base URL (proxies, compatible servers, tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    fn to_wire_request(&self, request: &PromptRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

// No Debug derive: the struct holds the API key.

impl ModelBackend for ChatCompletionsBackend {
    fn name(&self) -> &str {
        "chat_completions"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &PromptRequest) -> Result<ModelReply, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.to_wire_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, self.timeout))?;

        let parsed: ChatCompletionResponse = read_json(response, self.timeout).await?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::MalformedResponse("response has no choices".to_string()))?
            .message
            .content;
        let text = require_text(content, "choices[0].message.content")?;

        Ok(ModelReply {
            text,
            response_id: parsed.id.filter(|id| !id.is_empty()),
        })
    }
}
