use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors from a remote model call.
///
/// Each variant is a distinct outcome so the router can pick a user-facing
/// message without exposing any of the detail carried here.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("model API returned HTTP {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GatewayError {
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            GatewayError::Timeout(_) => GatewayErrorKind::Timeout,
            GatewayError::Transport(_) => GatewayErrorKind::Transport,
            GatewayError::Api { .. } => GatewayErrorKind::Api,
            GatewayError::MalformedResponse(_) => GatewayErrorKind::MalformedResponse,
            GatewayError::InvalidInput(_) => GatewayErrorKind::InvalidInput,
        }
    }
}

/// Fieldless discriminant of [`GatewayError`], for logs and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Timeout,
    Transport,
    Api,
    MalformedResponse,
    InvalidInput,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayErrorKind::Timeout => write!(f, "timeout"),
            GatewayErrorKind::Transport => write!(f, "transport"),
            GatewayErrorKind::Api => write!(f, "api"),
            GatewayErrorKind::MalformedResponse => write!(f, "malformed_response"),
            GatewayErrorKind::InvalidInput => write!(f, "invalid_input"),
        }
    }
}

/// Failure to deliver a message to the chat platform.
#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Errors constructing a [`crate::chat::ChatId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatIdError {
    #[error("chat id must not be empty")]
    Empty,
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}
