//! Prompt and reply types for remote model calls.
//!
//! A `PromptRequest` is built fresh for every call from the chat's context
//! window plus the new user message, and is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::Role;

/// Role of a message inside a prompt.
///
/// Superset of [`Role`]: prompts may also carry a fixed system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        }
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::System => write!(f, "system"),
            PromptRole::User => write!(f, "user"),
            PromptRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role-tagged message in a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One outbound request to the remote model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Messages in chronological order: optional system instruction first,
    /// then history, then the new user message last.
    pub messages: Vec<PromptMessage>,
    /// Response id of the newest assistant turn in the history, for APIs that
    /// thread conversations server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_response_id: Option<String>,
}

impl PromptRequest {
    /// The system instruction, if the first message carries one.
    pub fn system(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == PromptRole::System)
            .map(|m| m.content.as_str())
    }

    /// Conversation messages (everything except a leading system instruction).
    pub fn conversation(&self) -> &[PromptMessage] {
        match self.messages.first() {
            Some(m) if m.role == PromptRole::System => &self.messages[1..],
            _ => &self.messages,
        }
    }

    /// The new user message (always the last message).
    pub fn latest_user_message(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Successful result of a model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
    /// Message id assigned by the remote API, when it provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl ModelReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            response_id: None,
        }
    }
}
