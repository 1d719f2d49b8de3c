//! Wire types for the model APIs.
//!
//! These are API-specific request/response structures. They are NOT the
//! generic prompt types from relaybot-types -- those are backend-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `POST /agents/{id}/call`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentCallRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentCallResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}
