//! TelegramClient -- thin Bot API client over `reqwest`.
//!
//! Every method is a JSON `POST {base}/bot{token}/{method}`. The token is a
//! [`SecretString`]; since it is part of the URL, request errors are stripped
//! of their URL before being turned into [`TelegramError`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use relaybot_core::router::ChatSender;
use relaybot_types::chat::ChatId;
use relaybot_types::error::DeliveryError;

use super::types::{ApiResponse, Update, User};

/// Maximum characters Telegram accepts in one text message.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Slack added to the HTTP timeout on top of the long-poll timeout.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Transport(String),

    #[error("telegram API error {}: {description}", .code.map(|c| c.to_string()).unwrap_or_else(|| "?".into()))]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("unexpected telegram response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Transport(err.without_url().to_string())
    }
}

pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl TelegramClient {
    /// Create a client for `api_base_url` (e.g. `https://api.telegram.org`).
    ///
    /// `poll_timeout` is the long-poll timeout used with `getUpdates`; the
    /// HTTP timeout is set a little above it.
    pub fn new(
        token: SecretString,
        api_base_url: &str,
        poll_timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(poll_timeout + HTTP_TIMEOUT_SLACK)
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method);
        let response = self.client.post(&url).json(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(TelegramError::Decode(format!("{method}: {e}")));
            }
            Err(_) => {
                return Err(TelegramError::Api {
                    code: Some(i64::from(status.as_u16())),
                    description: body.chars().take(200).collect(),
                });
            }
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code,
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Decode(format!("{method}: missing result")))
    }

    /// The bot's own account.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &json!({})).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut params = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "edited_message"],
        });
        if let Some(offset) = offset {
            params["offset"] = json!(offset);
        }
        self.call("getUpdates", &params).await
    }

    /// Send `text`, split into as many messages as the length limit requires.
    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<(), TelegramError> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let _: serde_json::Value = self
                .call(
                    "sendMessage",
                    &json!({"chat_id": chat_id.as_str(), "text": chunk}),
                )
                .await?;
        }
        Ok(())
    }

    pub async fn send_chat_action(&self, chat_id: &ChatId, action: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "sendChatAction",
                &json!({"chat_id": chat_id.as_str(), "action": action}),
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ChatSender for TelegramClient {
    async fn send(&self, chat_id: &ChatId, text: &str) -> Result<(), DeliveryError> {
        self.send_message(chat_id, text)
            .await
            .map_err(|e| DeliveryError(e.to_string()))
    }

    async fn send_typing(&self, chat_id: &ChatId) -> Result<(), DeliveryError> {
        self.send_chat_action(chat_id, "typing")
            .await
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// A chunk ends at the last newline inside the limit when there is one,
/// otherwise exactly at the limit. Empty text yields a single empty chunk.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.chars().count() > max_chars {
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let window = &rest[..limit];
        match window.rfind('\n').filter(|&pos| pos > 0) {
            Some(pos) => {
                chunks.push(window[..pos].to_string());
                rest = &rest[pos + 1..];
            }
            None => {
                chunks.push(window.to_string());
                rest = &rest[limit..];
            }
        }
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}
