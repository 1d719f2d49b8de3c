//! Configuration loader for relaybot.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Credentials are not handled here; they come in
//! through the CLI layer as secrets.

use std::path::Path;

use relaybot_types::config::{BackendKind, RelayConfig};
use relaybot_types::error::ConfigError;

pub const ENV_MAX_CONTEXT_SIZE: &str = "MAX_CONTEXT_SIZE";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const ENV_MODEL_BACKEND: &str = "MODEL_BACKEND";
pub const ENV_MODEL_API_URL: &str = "MODEL_API_URL";
pub const ENV_MODEL_NAME: &str = "MODEL_NAME";
pub const ENV_SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";

/// Load configuration from `path` (if given) and the process environment.
pub async fn load_relay_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let config = match path {
        Some(path) => load_config_file(path).await?,
        None => RelayConfig::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Read and parse a TOML config file. An explicitly given path must exist.
pub async fn load_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let config = toml::from_str::<RelayConfig>(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// `lookup` returns the raw value of a variable, so tests can supply a map
/// instead of touching the process environment. Empty values are treated
/// as unset.
pub fn apply_env_overrides<F>(mut config: RelayConfig, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(raw) = get(ENV_MAX_CONTEXT_SIZE) {
        config.context.max_context_size = parse_number(ENV_MAX_CONTEXT_SIZE, &raw)?;
    }
    if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
        config.gateway.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT, &raw)?;
    }
    if let Some(raw) = get(ENV_MODEL_BACKEND) {
        config.gateway.backend =
            raw.parse::<BackendKind>()
                .map_err(|reason| ConfigError::Invalid {
                    key: ENV_MODEL_BACKEND.to_string(),
                    value: raw.clone(),
                    reason,
                })?;
    }
    if let Some(raw) = get(ENV_MODEL_API_URL) {
        config.gateway.base_url = Some(raw);
    }
    if let Some(raw) = get(ENV_MODEL_NAME) {
        config.gateway.model = raw;
    }
    if let Some(raw) = get(ENV_SYSTEM_PROMPT) {
        config.gateway.system_prompt = Some(raw);
    }

    Ok(config)
}

/// Reject settings that would make the bot unusable.
pub fn validate(config: &RelayConfig) -> Result<(), ConfigError> {
    if config.gateway.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "request_timeout_secs".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }

    let base_url = config.gateway.resolved_base_url();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "base_url".to_string(),
            value: base_url,
            reason: "must be an http(s) URL".to_string(),
        });
    }

    if let Some(temperature) = config.gateway.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "temperature".to_string(),
                value: temperature.to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            });
        }
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}
