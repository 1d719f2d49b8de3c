//! CLI definitions for the `relaybot` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;

/// Relay Telegram chats to a hosted language model.
#[derive(Parser)]
#[command(name = "relaybot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, global = true, env = "RELAYBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only log errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// More log output (-v for debug in relaybot crates, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log one JSON object per event.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Poll Telegram and answer messages (default).
    Run,

    /// Print the resolved configuration as JSON and exit.
    CheckConfig,
}

/// Credentials, read from flags or the environment and never logged.
#[derive(Args)]
pub struct CredentialArgs {
    /// Telegram bot token.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Bearer key for the chat-completions backend.
    #[arg(long, env = "MODEL_API_KEY", hide_env_values = true)]
    pub model_api_key: Option<String>,

    /// Agent id for the agent-call backend.
    #[arg(long, env = "AGENT_ACCESS_ID", hide_env_values = true)]
    pub agent_access_id: Option<String>,
}

/// Credentials wrapped as secrets.
pub struct Credentials {
    pub bot_token: Option<SecretString>,
    pub model_api_key: Option<SecretString>,
    pub agent_access_id: Option<SecretString>,
}

impl CredentialArgs {
    pub fn into_secrets(self) -> Credentials {
        let secret = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };
        Credentials {
            bot_token: secret(self.bot_token),
            model_api_key: secret(self.model_api_key),
            agent_access_id: secret(self.agent_access_id),
        }
    }
}

impl Cli {
    /// Default log filter for the chosen verbosity, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,relaybot_core=debug,relaybot_infra=debug,relaybot=debug",
            _ => "trace",
        }
    }
}
