//! MessageRouter -- the inbound message pipeline.
//!
//! For each message: classify, then either ignore it, reply with a fixed
//! text, reset the chat's context, or run the answer flow. The answer flow
//! (read history, call the model, append the exchange, reply) runs under a
//! per-chat async mutex so two answers for the same chat never interleave,
//! while different chats proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use relaybot_types::chat::{ChatId, InboundMessage, Turn};
use relaybot_types::error::GatewayErrorKind;

use crate::context::ContextStore;
use crate::gateway::ModelClient;

use super::intent::{Intent, classify};
use super::outbound::ChatSender;
use super::replies::{ASK_USAGE, GREETING, RESET_CONFIRMATION, error_reply, help_text};

/// What happened to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not addressed to the bot; nothing sent, nothing stored.
    Ignored,
    /// A fixed reply was sent (greeting, help, reset confirmation, usage).
    Replied,
    /// The model answered and the exchange was stored.
    Answered,
    /// The model call failed; an apology was sent and nothing was stored.
    Failed(GatewayErrorKind),
}

/// Routes inbound messages to the context store and model gateway.
///
/// Generic over `ContextStore` and `ChatSender` so core never depends on a
/// concrete platform or storage implementation.
pub struct MessageRouter<S: ContextStore, O: ChatSender> {
    store: Arc<S>,
    gateway: ModelClient,
    sender: O,
    bot_username: Option<String>,
    chat_locks: DashMap<ChatId, Arc<Mutex<()>>>,
}

impl<S: ContextStore, O: ChatSender> MessageRouter<S, O> {
    pub fn new(store: Arc<S>, gateway: ModelClient, sender: O) -> Self {
        Self {
            store,
            gateway,
            sender,
            bot_username: None,
            chat_locks: DashMap::new(),
        }
    }

    /// Set the bot's handle, used to recognize mentions in group chats.
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username.map(|u| u.trim_start_matches('@').to_string());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sender(&self) -> &O {
        &self.sender
    }

    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }

    /// Handle one inbound message end to end.
    pub async fn handle(&self, message: InboundMessage) -> Outcome {
        let chat_id = &message.chat_id;
        let intent = classify(&message, self.bot_username.as_deref());
        debug!(
            %chat_id,
            message_id = ?message.message_id,
            edited = message.edited,
            sender_id = ?message.sender.as_ref().map(|s| s.id),
            "inbound message"
        );

        match intent {
            Intent::Ineligible => {
                debug!(%chat_id, kind = %message.chat_kind, "message not addressed to bot");
                Outcome::Ignored
            }
            Intent::Greet => {
                self.deliver(chat_id, GREETING).await;
                Outcome::Replied
            }
            Intent::Help => {
                self.deliver(chat_id, &help_text(self.store.max_context_size()))
                    .await;
                Outcome::Replied
            }
            Intent::Reset => {
                let lock = self.chat_lock(chat_id);
                {
                    let _guard = lock.lock().await;
                    self.store.reset(chat_id);
                }
                self.release_lock(chat_id, lock);
                self.deliver(chat_id, RESET_CONFIRMATION).await;
                Outcome::Replied
            }
            Intent::Ask(question) if question.is_empty() => {
                self.deliver(chat_id, ASK_USAGE).await;
                Outcome::Replied
            }
            Intent::Ask(text) | Intent::Plain(text) => self.answer(chat_id, &text).await,
        }
    }

    /// Run the answer flow for `text` in `chat_id`.
    ///
    /// On success the user turn and the reply are appended together; on
    /// failure nothing is appended.
    pub async fn answer(&self, chat_id: &ChatId, text: &str) -> Outcome {
        let lock = self.chat_lock(chat_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.answer_locked(chat_id, text).await
        };
        self.release_lock(chat_id, lock);
        outcome
    }

    async fn answer_locked(&self, chat_id: &ChatId, text: &str) -> Outcome {
        let history = self.store.get(chat_id);

        if let Err(e) = self.sender.send_typing(chat_id).await {
            debug!(%chat_id, error = %e, "typing indicator not delivered");
        }

        match self.gateway.generate(&history, text).await {
            Ok(reply) => {
                let user_turn = Turn::user(text.trim());
                let assistant_turn =
                    Turn::assistant(reply.text.clone()).with_response_id(reply.response_id);
                self.store.append_exchange(chat_id, user_turn, assistant_turn);
                info!(
                    %chat_id,
                    history_len = history.len(),
                    reply_chars = reply.text.chars().count(),
                    "answered message"
                );
                self.deliver(chat_id, &reply.text).await;
                Outcome::Answered
            }
            Err(e) => {
                warn!(%chat_id, kind = %e.kind(), error = %e, "model call failed");
                self.deliver(chat_id, error_reply(&e)).await;
                Outcome::Failed(e.kind())
            }
        }
    }

    fn chat_lock(&self, chat_id: &ChatId) -> Arc<Mutex<()>> {
        self.chat_locks.entry(chat_id.clone()).or_default().clone()
    }

    /// Drop our handle on the chat's lock and forget the entry once no other
    /// task holds or waits on it.
    fn release_lock(&self, chat_id: &ChatId, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.chat_locks
            .remove_if(chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn deliver(&self, chat_id: &ChatId, text: &str) {
        if let Err(e) = self.sender.send(chat_id, text).await {
            warn!(%chat_id, error = %e, "failed to deliver reply");
        }
    }
}

impl<S: ContextStore, O: ChatSender> std::fmt::Debug for MessageRouter<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("bot_username", &self.bot_username)
            .field("gateway", &self.gateway)
            .field("busy_chats", &self.chat_locks.len())
            .finish()
    }
}
