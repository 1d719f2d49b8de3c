//! Configuration types for relaybot.
//!
//! `RelayConfig` is the top-level configuration. It can be loaded from an
//! optional TOML file and overridden from the environment; all fields have
//! defaults so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default bound on turns retained per chat.
pub const DEFAULT_MAX_CONTEXT_SIZE: usize = 10;

/// Default deadline for one model call, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Context store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum turns retained per chat. `0` keeps no history at all.
    #[serde(default = "default_max_context_size")]
    pub max_context_size: usize,
}

fn default_max_context_size() -> usize {
    DEFAULT_MAX_CONTEXT_SIZE
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_size: default_max_context_size(),
        }
    }
}

/// Which remote API shape the gateway speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// OpenAI-style `POST /chat/completions` with a role-tagged message list.
    #[default]
    ChatCompletions,
    /// Agent endpoint taking a single message plus a parent message id.
    AgentCall,
}

impl BackendKind {
    /// Base URL used when none is configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            BackendKind::ChatCompletions => "https://api.openai.com/v1",
            BackendKind::AgentCall => "https://agent.timeweb.cloud/api/v1/cloud-ai",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::ChatCompletions => write!(f, "chat_completions"),
            BackendKind::AgentCall => write!(f, "agent_call"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "chat_completions" => Ok(BackendKind::ChatCompletions),
            "agent_call" | "agent" => Ok(BackendKind::AgentCall),
            other => Err(format!("invalid backend: '{other}'")),
        }
    }
}

/// Model gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Override the backend's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model identifier sent with chat-completions requests.
    #[serde(default = "default_model")]
    pub model: String,
    /// Hard deadline for one model call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Fixed system instruction prepended to every prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured base URL, or the backend's default, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Telegram adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: default_poll_timeout_secs(),
            api_base_url: default_telegram_api_base_url(),
        }
    }
}
