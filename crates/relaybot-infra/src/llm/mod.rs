//! Model backend implementations.
//!
//! Contains concrete implementations of the [`ModelBackend`] trait defined
//! in `relaybot-core`, plus a factory ([`create_backend`]) that picks one
//! from a [`GatewayConfig`].
//!
//! [`ModelBackend`]: relaybot_core::gateway::ModelBackend

pub mod agent_call;
pub mod chat_completions;
pub mod types;

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use relaybot_core::gateway::BoxModelBackend;
use relaybot_types::config::{BackendKind, GatewayConfig};
use relaybot_types::error::GatewayError;

use self::agent_call::AgentCallBackend;
use self::chat_completions::ChatCompletionsBackend;

/// Longest slice of an error response body kept in [`GatewayError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Credentials for the model API, resolved by the caller.
#[derive(Default)]
pub struct BackendCredentials {
    /// Bearer key for the chat-completions backend.
    pub api_key: Option<SecretString>,
    /// Agent identifier for the agent-call backend.
    pub agent_access_id: Option<SecretString>,
}

/// Errors constructing a backend at startup.
#[derive(Debug, Error)]
pub enum BackendSetupError {
    #[error("{backend} backend requires {credential}")]
    MissingCredential {
        backend: BackendKind,
        credential: &'static str,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Create a [`BoxModelBackend`] for the configured backend kind.
pub fn create_backend(
    config: &GatewayConfig,
    credentials: BackendCredentials,
) -> Result<BoxModelBackend, BackendSetupError> {
    let base_url = config.resolved_base_url();
    let timeout = config.request_timeout();

    match config.backend {
        BackendKind::ChatCompletions => {
            let api_key = credentials
                .api_key
                .ok_or(BackendSetupError::MissingCredential {
                    backend: config.backend,
                    credential: "MODEL_API_KEY",
                })?;
            let backend = ChatCompletionsBackend::new(api_key, config.model.clone(), timeout)?
                .with_base_url(base_url)
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature);
            Ok(BoxModelBackend::new(backend))
        }
        BackendKind::AgentCall => {
            let agent_id = credentials
                .agent_access_id
                .ok_or(BackendSetupError::MissingCredential {
                    backend: config.backend,
                    credential: "AGENT_ACCESS_ID",
                })?;
            let backend = AgentCallBackend::new(agent_id, timeout)?.with_base_url(base_url);
            Ok(BoxModelBackend::new(backend))
        }
    }
}

/// Build the shared HTTP client for a backend.
///
/// The client's own timeout mirrors the gateway deadline, so a stalled
/// connection is also reported as [`GatewayError::Timeout`].
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Map a failed send or body read.
pub(crate) fn classify_reqwest_error(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Read a response and decode its JSON body, classifying every failure.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_reqwest_error(e, timeout))?;

    if !status.is_success() {
        return Err(GatewayError::Api {
            status_code: status.as_u16(),
            message: truncate(&body, MAX_ERROR_BODY_CHARS),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| GatewayError::MalformedResponse(format!("failed to parse response: {e}")))
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Non-empty reply text, or `MalformedResponse` naming the missing field.
pub(crate) fn require_text(text: Option<String>, field: &str) -> Result<String, GatewayError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| GatewayError::MalformedResponse(format!("missing or empty `{field}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("привет", 2), "пр...");
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("hi".into()), "message").unwrap(), "hi");
        let err = require_text(Some("  ".into()), "message").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
        assert!(require_text(None, "message").is_err());
    }

    #[test]
    fn test_create_backend_requires_credential() {
        let config = GatewayConfig::default();
        let err = create_backend(&config, BackendCredentials::default()).unwrap_err();
        assert!(err.to_string().contains("MODEL_API_KEY"));

        let config = GatewayConfig {
            backend: BackendKind::AgentCall,
            ..GatewayConfig::default()
        };
        let err = create_backend(&config, BackendCredentials::default()).unwrap_err();
        assert!(err.to_string().contains("AGENT_ACCESS_ID"));
    }

    #[test]
    fn test_create_backend_selects_kind() {
        let creds = BackendCredentials {
            api_key: Some(SecretString::from("sk-test".to_string())),
            agent_access_id: Some(SecretString::from("agent-1".to_string())),
        };
        let backend = create_backend(&GatewayConfig::default(), creds).unwrap();
        assert_eq!(backend.name(), "chat_completions");
        assert_eq!(backend.model(), "gpt-4o-mini");

        let creds = BackendCredentials {
            api_key: None,
            agent_access_id: Some(SecretString::from("agent-1".to_string())),
        };
        let config = GatewayConfig {
            backend: BackendKind::AgentCall,
            ..GatewayConfig::default()
        };
        let backend = create_backend(&config, creds).unwrap();
        assert_eq!(backend.name(), "agent_call");
    }
}
