//! Chat identifiers, conversation turns, and inbound message types.
//!
//! A `Turn` is one message in a chat's context window, tagged with the
//! speaker role. `InboundMessage` is the platform-neutral shape of an
//! incoming chat event after the messaging adapter has normalized it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ChatIdError;

/// Opaque identifier of a chat on the messaging platform.
///
/// Always non-empty: the only constructors are `From<i64>` and `FromStr`,
/// and the latter rejects blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatId(String);

impl ChatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChatId {
    type Err = ChatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChatIdError::Empty);
        }
        Ok(ChatId(trimmed.to_string()))
    }
}

impl TryFrom<String> for ChatId {
    type Error = ChatIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChatId> for String {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId(id.to_string())
    }
}

/// Speaker of a turn in the context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// One message in a chat's context window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// When the turn was recorded. Debugging aid only; ordering comes from
    /// insertion order, not from this field.
    pub timestamp: DateTime<Utc>,
    /// Message id assigned by the remote model API (assistant turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl Turn {
    /// A user turn stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            response_id: None,
        }
    }

    /// An assistant turn stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            response_id: None,
        }
    }

    pub fn with_response_id(mut self, response_id: Option<String>) -> Self {
        self.response_id = response_id;
        self
    }
}

/// Kind of chat an inbound message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Whether more than one human can post in this chat.
    pub fn is_multi_party(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Private => write!(f, "private"),
            ChatKind::Group => write!(f, "group"),
            ChatKind::Supergroup => write!(f, "supergroup"),
            ChatKind::Channel => write!(f, "channel"),
        }
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(ChatKind::Private),
            "group" => Ok(ChatKind::Group),
            "supergroup" => Ok(ChatKind::Supergroup),
            "channel" => Ok(ChatKind::Channel),
            other => Err(format!("invalid chat kind: '{other}'")),
        }
    }
}

/// Who sent an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
    pub display_name: String,
    pub is_bot: bool,
}

/// An incoming chat event, normalized by the messaging adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub sender: Option<Sender>,
    pub text: String,
    /// Platform message id, used for logging.
    pub message_id: Option<i64>,
    /// True when this is an edit of an earlier message.
    #[serde(default)]
    pub edited: bool,
}

impl InboundMessage {
    /// Convenience constructor for a fresh (non-edited) message.
    pub fn new(chat_id: ChatId, chat_kind: ChatKind, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            chat_kind,
            sender: None,
            text: text.into(),
            message_id: None,
            edited: false,
        }
    }
}
