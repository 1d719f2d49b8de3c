//! Model gateway: turns a chat's history plus a new message into one remote
//! model call.
//!
//! - `backend` -- `ModelBackend`: RPITIT trait for concrete API clients
//! - `box_backend` -- `BoxModelBackend`: object-safe wrapper for runtime selection
//! - `prompt` -- prompt assembly and transcript rendering
//! - `client` -- `ModelClient`: input validation, deadline, reply checks

pub mod backend;
pub mod box_backend;
pub mod client;
pub mod prompt;

pub use backend::ModelBackend;
pub use box_backend::BoxModelBackend;
pub use client::ModelClient;
