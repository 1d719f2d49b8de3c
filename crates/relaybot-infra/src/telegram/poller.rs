//! UpdatePoller -- the long-poll loop that feeds the router.
//!
//! The router's outbound sender is the same [`TelegramClient`] that polls.
//! Each update is handled on its own task so chats proceed in parallel; the
//! router serializes work within a chat. On cancellation the loop stops
//! polling and waits for in-flight handlers before returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use relaybot_core::context::ContextStore;
use relaybot_core::router::MessageRouter;

use super::client::TelegramClient;

/// Pause after a failed `getUpdates` before polling again.
const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(3);

pub struct UpdatePoller<S: ContextStore + 'static> {
    router: Arc<MessageRouter<S, TelegramClient>>,
    poll_timeout_secs: u64,
    error_backoff: Duration,
}

impl<S: ContextStore + 'static> UpdatePoller<S> {
    pub fn new(router: Arc<MessageRouter<S, TelegramClient>>, poll_timeout_secs: u64) -> Self {
        Self {
            router,
            poll_timeout_secs,
            error_backoff: DEFAULT_ERROR_BACKOFF,
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Poll until `cancel` fires, then drain in-flight handlers.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut offset: Option<i64> = None;
        let mut handlers: JoinSet<()> = JoinSet::new();
        let client = self.router.sender();

        info!(poll_timeout_secs = self.poll_timeout_secs, "polling for updates");

        loop {
            let polled = tokio::select! {
                _ = cancel.cancelled() => break,
                polled = client.get_updates(offset, self.poll_timeout_secs) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let update_id = update.update_id;
                        let Some(message) = update.into_inbound() else {
                            debug!(update_id, "skipping update without text");
                            continue;
                        };
                        let router = Arc::clone(&self.router);
                        handlers.spawn(async move {
                            let chat_id = message.chat_id.clone();
                            let outcome = router.handle(message).await;
                            debug!(update_id, %chat_id, ?outcome, "update handled");
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, backoff = ?self.error_backoff, "getUpdates failed");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
            }

            while let Some(joined) = handlers.try_join_next() {
                if let Err(e) = joined {
                    warn!(error = %e, "update handler panicked");
                }
            }
        }

        let in_flight = handlers.len();
        if in_flight > 0 {
            info!(in_flight, "waiting for in-flight updates");
        }
        while let Some(joined) = handlers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "update handler panicked");
            }
        }
        info!("update polling stopped");
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use relaybot_core::context::InMemoryContextStore;
    use relaybot_core::gateway::{BoxModelBackend, ModelBackend, ModelClient};
    use relaybot_types::chat::ChatId;
    use relaybot_types::error::GatewayError;
    use relaybot_types::llm::{ModelReply, PromptRequest};

    use super::*;

    struct FixedBackend;

    impl ModelBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &PromptRequest) -> Result<ModelReply, GatewayError> {
            Ok(ModelReply::new("Hi there!"))
        }
    }

    fn fixed_gateway() -> ModelClient {
        ModelClient::new(BoxModelBackend::new(FixedBackend), Duration::from_secs(5))
    }

    fn telegram_client(server: &MockServer) -> TelegramClient {
        TelegramClient::new(
            SecretString::from("tok".to_string()),
            &server.uri(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn polls_routes_and_replies() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bottok/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [{
                    "update_id": 100,
                    "message": {"message_id": 1, "chat": {"id": 42, "type": "private"}, "text": "Hello"}
                }]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bottok/getUpdates"))
            .and(body_partial_json(json!({"offset": 101})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": []}))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bottok/sendChatAction"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bottok/sendMessage"))
            .and(body_partial_json(json!({"chat_id": "42", "text": "Hi there!"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 2, "chat": {"id": 42, "type": "private"}, "text": "Hi there!"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryContextStore::new(10));
        let router = Arc::new(MessageRouter::new(
            Arc::clone(&store),
            fixed_gateway(),
            telegram_client(&server),
        ));

        let poller = UpdatePoller::new(router, 0);
        let cancel = CancellationToken::new();
        let run = {
            let cancel = cancel.clone();
            tokio::spawn(async move { poller.run(cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
        run.await.unwrap();

        let history = store.get(&ChatId::from(42));
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text, "Hi there!");
    }

    #[tokio::test]
    async fn poll_errors_back_off_and_stop_on_cancel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bottok/getUpdates"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let router = Arc::new(MessageRouter::new(
            Arc::new(InMemoryContextStore::new(10)),
            fixed_gateway(),
            telegram_client(&server),
        ));

        let poller = UpdatePoller::new(router, 0).with_error_backoff(Duration::from_millis(100));
        let cancel = CancellationToken::new();
        let run = {
            let cancel = cancel.clone();
            tokio::spawn(async move { poller.run(cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(250)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("poller did not stop")
            .unwrap();

        // A few polls, not a tight loop.
        let polls = server.received_requests().await.unwrap().len();
        assert!((1..=5).contains(&polls), "polled {polls} times");
    }
}
