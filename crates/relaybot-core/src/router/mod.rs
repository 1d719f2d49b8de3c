//! Message routing: from an inbound chat event to a reply.
//!
//! - `intent` -- `Intent` classification of inbound messages
//! - `mention` -- detection and removal of `@botname` mentions
//! - `outbound` -- `ChatSender` port for delivering replies
//! - `replies` -- fixed user-facing texts
//! - `service` -- `MessageRouter`, the per-chat serialized answer flow

pub mod intent;
pub mod mention;
pub mod outbound;
pub mod replies;
pub mod service;

pub use intent::{Intent, classify};
pub use outbound::ChatSender;
pub use service::{MessageRouter, Outcome};
