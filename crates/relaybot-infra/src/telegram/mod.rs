//! Telegram Bot API adapter.
//!
//! - `types` -- wire types and normalization into `InboundMessage`
//! - `client` -- `TelegramClient`: Bot API calls, implements `ChatSender`
//! - `poller` -- `UpdatePoller`: long-poll loop feeding the router

pub mod client;
pub mod poller;
pub mod types;

pub use client::{TelegramClient, TelegramError};
pub use poller::UpdatePoller;
