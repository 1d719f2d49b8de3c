//! relaybot entry point.
//!
//! Binary name: `relaybot`
//!
//! Parses CLI arguments, resolves configuration, then either prints it or
//! runs the long-poll loop until Ctrl+C / SIGTERM.

mod cli;
mod state;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use relaybot_infra::config::load_relay_config;
use relaybot_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: cli.log_filter().to_string(),
        json: cli.json_logs,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_relay_config(cli.config.as_deref())
        .await
        .context("invalid configuration")?;
    let credentials = cli.credentials.into_secrets();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::CheckConfig => {
            let report = serde_json::json!({
                "config": config,
                "credentials": {
                    "bot_token": credentials.bot_token.is_some(),
                    "model_api_key": credentials.model_api_key.is_some(),
                    "agent_access_id": credentials.agent_access_id.is_some(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Run => {
            let state = AppState::init(config, credentials).await?;
            let poller = state.poller();

            let cancel = CancellationToken::new();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    shutdown_signal().await;
                    tracing::info!("shutdown signal received");
                    cancel.cancel();
                }
            });

            poller.run(cancel).await;
            tracing::info!(chats = state.store.chat_count(), "relaybot stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
