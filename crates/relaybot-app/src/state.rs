//! Application state wiring all components together.
//!
//! `AppState` pins the generic router to the concrete in-memory store and
//! the Telegram client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use relaybot_core::context::InMemoryContextStore;
use relaybot_core::gateway::ModelClient;
use relaybot_core::router::MessageRouter;
use relaybot_infra::llm::{BackendCredentials, create_backend};
use relaybot_infra::telegram::{TelegramClient, UpdatePoller};
use relaybot_types::config::RelayConfig;

use crate::cli::Credentials;

pub type ConcreteRouter = MessageRouter<InMemoryContextStore, TelegramClient>;

pub struct AppState {
    pub config: RelayConfig,
    pub store: Arc<InMemoryContextStore>,
    pub router: Arc<ConcreteRouter>,
}

impl AppState {
    /// Build every component and confirm the bot token with `getMe`.
    pub async fn init(config: RelayConfig, credentials: Credentials) -> anyhow::Result<Self> {
        let bot_token = credentials
            .bot_token
            .context("BOT_TOKEN is required (flag --bot-token or environment)")?;

        let telegram = TelegramClient::new(
            bot_token,
            &config.telegram.api_base_url,
            Duration::from_secs(config.telegram.poll_timeout_secs),
        )?;
        let me = telegram
            .get_me()
            .await
            .context("failed to verify bot token with getMe")?;

        let backend = create_backend(
            &config.gateway,
            BackendCredentials {
                api_key: credentials.model_api_key,
                agent_access_id: credentials.agent_access_id,
            },
        )?;
        let gateway = ModelClient::new(backend, config.gateway.request_timeout())
            .with_system_prompt(config.gateway.system_prompt.clone());

        let store = Arc::new(InMemoryContextStore::new(config.context.max_context_size));
        let router = Arc::new(
            MessageRouter::new(Arc::clone(&store), gateway, telegram)
                .with_bot_username(me.username.clone()),
        );

        tracing::info!(
            bot = me.username.as_deref().unwrap_or("<none>"),
            backend = %config.gateway.backend,
            model = %config.gateway.model,
            max_context_size = config.context.max_context_size,
            request_timeout_secs = config.gateway.request_timeout_secs,
            "relaybot initialized"
        );

        Ok(Self {
            config,
            store,
            router,
        })
    }

    pub fn poller(&self) -> UpdatePoller<InMemoryContextStore> {
        UpdatePoller::new(
            Arc::clone(&self.router),
            self.config.telegram.poll_timeout_secs,
        )
    }
}
