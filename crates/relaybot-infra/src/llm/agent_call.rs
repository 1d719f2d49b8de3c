//! AgentCallBackend -- [`ModelBackend`] for agent endpoints that take a single
//! message per call (`POST {base}/agents/{agent_id}/call`).
//!
//! History is flattened into a transcript with
//! [`render_transcript`], and the newest stored response id is sent as
//! `parent_message_id` so the remote thread follows local history.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use relaybot_core::gateway::ModelBackend;
use relaybot_core::gateway::prompt::render_transcript;
use relaybot_types::config::BackendKind;
use relaybot_types::error::GatewayError;
use relaybot_types::llm::{ModelReply, PromptRequest};

use super::types::{AgentCallRequest, AgentCallResponse};
use super::{classify_reqwest_error, http_client, read_json, require_text};

pub struct AgentCallBackend {
    client: reqwest::Client,
    agent_id: SecretString,
    base_url: String,
    timeout: Duration,
}

impl AgentCallBackend {
    pub fn new(agent_id: SecretString, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            agent_id,
            base_url: BackendKind::AgentCall.default_base_url().to_string(),
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl ModelBackend for AgentCallBackend {
    fn name(&self) -> &str {
        "agent_call"
    }

    fn model(&self) -> &str {
        "agent"
    }

    async fn complete(&self, request: &PromptRequest) -> Result<ModelReply, GatewayError> {
        let url = format!(
            "{}/agents/{}/call",
            self.base_url,
            self.agent_id.expose_secret()
        );
        let body = AgentCallRequest {
            message: render_transcript(request),
            parent_message_id: request.parent_response_id.clone(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, self.timeout))?;

        let parsed: AgentCallResponse = read_json(response, self.timeout).await?;
        let text = require_text(parsed.message, "message")?;

        Ok(ModelReply {
            text,
            response_id: parsed.id.filter(|id| !id.is_empty()),
        })
    }
}
