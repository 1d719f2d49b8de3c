//! Telegram Bot API wire types (the subset the bot reads).

use serde::Deserialize;

use relaybot_types::chat::{ChatId, ChatKind, InboundMessage, Sender};

/// Envelope every Bot API method returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

impl From<User> for Sender {
    fn from(user: User) -> Self {
        let display_name = user.display_name();
        Sender {
            id: user.id,
            username: user.username,
            display_name,
            is_bot: user.is_bot,
        }
    }
}

impl Update {
    /// Normalize a text message (new or edited) into an [`InboundMessage`].
    ///
    /// Returns `None` for updates without text and for unknown chat types.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let (message, edited) = match (self.message, self.edited_message) {
            (Some(message), _) => (message, false),
            (None, Some(message)) => (message, true),
            (None, None) => return None,
        };

        let text = message.text?;
        let chat_kind = message.chat.kind.parse::<ChatKind>().ok()?;

        Some(InboundMessage {
            chat_id: ChatId::from(message.chat.id),
            chat_kind,
            sender: message.from.map(Sender::from),
            text,
            message_id: Some(message.message_id),
            edited,
        })
    }
}
