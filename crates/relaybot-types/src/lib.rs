//! Shared domain types for relaybot.
//!
//! This crate contains the types used across the relay: chat identifiers,
//! conversation turns, inbound platform messages, model prompt/reply shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
