//! Infrastructure for relaybot.
//!
//! Concrete implementations of the ports defined in `relaybot-core`:
//! HTTP model backends, the Telegram Bot API adapter, and configuration
//! loading from TOML and the environment.

pub mod config;
pub mod llm;
pub mod telegram;
