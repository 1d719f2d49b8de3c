//! ChatSender trait: the router's only way to talk back to a chat.

use relaybot_types::chat::ChatId;
use relaybot_types::error::DeliveryError;

/// Outbound delivery to the messaging platform.
///
/// Implementations live in relaybot-infra (e.g., `TelegramClient`). The
/// router treats delivery as fire-and-forget: failures are logged, never
/// retried, and never affect the context store.
pub trait ChatSender: Send + Sync {
    /// Deliver a text message to a chat.
    fn send(
        &self,
        chat_id: &ChatId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;

    /// Show a "typing..." indicator while a reply is being generated.
    fn send_typing(
        &self,
        chat_id: &ChatId,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}
