//! Test doubles for the gateway and outbound ports.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use relaybot_types::chat::ChatId;
use relaybot_types::error::{DeliveryError, GatewayError};
use relaybot_types::llm::{ModelReply, PromptRequest};

use crate::gateway::ModelBackend;
use crate::router::ChatSender;

type ErrorFactory = Arc<dyn Fn() -> GatewayError + Send + Sync>;

#[derive(Clone)]
enum Behavior {
    Reply(String),
    Echo,
    Fail(ErrorFactory),
}

/// Backend that records every prompt and answers from a fixed script.
#[derive(Clone)]
pub struct ScriptedBackend {
    behavior: Behavior,
    delay: Duration,
    requests: Arc<Mutex<Vec<PromptRequest>>>,
}

impl ScriptedBackend {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_behavior(Behavior::Reply(text.to_string()))
    }

    /// Replies with `echo: <latest user message>`.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn failing(factory: impl Fn() -> GatewayError + Send + Sync + 'static) -> Self {
        Self::with_behavior(Behavior::Fail(Arc::new(factory)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ModelBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &PromptRequest) -> Result<ModelReply, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            Behavior::Reply(text) => Ok(ModelReply::new(text.clone())),
            Behavior::Echo => Ok(ModelReply::new(format!(
                "echo: {}",
                request.latest_user_message().unwrap_or_default()
            ))),
            Behavior::Fail(factory) => Err(factory()),
        }
    }
}

/// Sender that records every delivered message.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<(ChatId, String)>>>,
    typing: Arc<Mutex<Vec<ChatId>>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose deliveries always fail (after recording them).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: &ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn typing_count(&self) -> usize {
        self.typing.lock().unwrap().len()
    }
}

impl ChatSender for RecordingSender {
    async fn send(&self, chat_id: &ChatId, text: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.clone(), text.to_string()));
        if self.fail {
            return Err(DeliveryError("chat unavailable".to_string()));
        }
        Ok(())
    }

    async fn send_typing(&self, chat_id: &ChatId) -> Result<(), DeliveryError> {
        self.typing.lock().unwrap().push(chat_id.clone());
        Ok(())
    }
}
