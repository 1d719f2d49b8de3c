//! Conversation core for relaybot.
//!
//! This crate holds everything with an invariant worth testing: the per-chat
//! bounded context store, the model gateway contract, and the message router
//! that ties them together. It defines the "ports" (`ModelBackend`,
//! `ChatSender`) that `relaybot-infra` implements, and never depends on any
//! HTTP or platform crate.

pub mod context;
pub mod gateway;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;
