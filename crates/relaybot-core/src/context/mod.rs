//! Per-chat conversation context.
//!
//! - `window` -- `ContextWindow`, a fixed-capacity FIFO of turns
//! - `store` -- `ContextStore` trait and the in-memory `InMemoryContextStore`

pub mod store;
pub mod window;

pub use store::{ContextStore, InMemoryContextStore};
pub use window::ContextWindow;
