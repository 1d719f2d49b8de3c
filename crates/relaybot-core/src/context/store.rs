//! Context store: one bounded history per chat.
//!
//! `ContextStore` is the injectable interface the router depends on.
//! `InMemoryContextStore` keeps each chat's `ContextWindow` in a `DashMap`,
//! so operations on different chats never contend on the same lock and
//! every operation is synchronous and non-blocking.

use dashmap::DashMap;
use tracing::{debug, info};

use relaybot_types::chat::{ChatId, Turn};

use super::window::ContextWindow;

/// Per-chat bounded conversation history.
///
/// Implementations must keep at most [`max_context_size`](Self::max_context_size)
/// turns per chat, oldest-first, evicting from the front.
pub trait ContextStore: Send + Sync {
    /// Current history for a chat, oldest-first. Empty if the chat is unseen.
    fn get(&self, chat_id: &ChatId) -> Vec<Turn>;

    /// Append one turn to the end of a chat's history.
    fn append(&self, chat_id: &ChatId, turn: Turn);

    /// Append a user turn and the assistant reply to it as one operation.
    ///
    /// No other store operation on the same chat observes only one of the two.
    fn append_exchange(&self, chat_id: &ChatId, user: Turn, assistant: Turn);

    /// Clear a chat's history. Succeeds silently for unseen chats.
    fn reset(&self, chat_id: &ChatId);

    /// Bound on turns retained per chat.
    fn max_context_size(&self) -> usize;
}

/// In-process [`ContextStore`] backed by a sharded concurrent map.
pub struct InMemoryContextStore {
    max_context_size: usize,
    chats: DashMap<ChatId, ContextWindow>,
}

impl InMemoryContextStore {
    pub fn new(max_context_size: usize) -> Self {
        Self {
            max_context_size,
            chats: DashMap::new(),
        }
    }

    /// Number of chats with an entry (including reset, now-empty ones).
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}

impl ContextStore for InMemoryContextStore {
    fn get(&self, chat_id: &ChatId) -> Vec<Turn> {
        self.chats
            .get(chat_id)
            .map(|window| window.to_vec())
            .unwrap_or_default()
    }

    fn append(&self, chat_id: &ChatId, turn: Turn) {
        let mut window = self
            .chats
            .entry(chat_id.clone())
            .or_insert_with(|| ContextWindow::new(self.max_context_size));
        if window.push(turn).is_some() {
            debug!(%chat_id, retained = window.len(), "evicted oldest turn");
        }
    }

    fn append_exchange(&self, chat_id: &ChatId, user: Turn, assistant: Turn) {
        // Both pushes happen under the same shard guard.
        let mut window = self
            .chats
            .entry(chat_id.clone())
            .or_insert_with(|| ContextWindow::new(self.max_context_size));
        let evicted = [window.push(user), window.push(assistant)]
            .into_iter()
            .flatten()
            .count();
        debug!(%chat_id, retained = window.len(), evicted, "appended exchange");
    }

    fn reset(&self, chat_id: &ChatId) {
        if let Some(mut window) = self.chats.get_mut(chat_id) {
            window.clear();
        }
        info!(%chat_id, "context cleared");
    }

    fn max_context_size(&self) -> usize {
        self.max_context_size
    }
}

impl std::fmt::Debug for InMemoryContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContextStore")
            .field("max_context_size", &self.max_context_size)
            .field("chats", &self.chats.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use relaybot_types::chat::Role;

    use super::*;

    fn chat(id: i64) -> ChatId {
        ChatId::from(id)
    }

    fn texts(turns: &[Turn]) -> Vec<&str> {
        turns.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn get_unseen_chat_is_empty_and_creates_nothing() {
        let store = InMemoryContextStore::new(10);
        assert!(store.get(&chat(1)).is_empty());
        assert_eq!(store.chat_count(), 0);
    }

    #[test]
    fn append_creates_history_lazily() {
        let store = InMemoryContextStore::new(10);
        store.append(&chat(1), Turn::user("Hello"));
        assert_eq!(store.chat_count(), 1);
        assert_eq!(texts(&store.get(&chat(1))), vec!["Hello"]);
    }

    #[test]
    fn twelve_appends_with_bound_ten_keep_t3_through_t12() {
        let store = InMemoryContextStore::new(10);
        let id = chat(7);
        for i in 1..=12 {
            store.append(&id, Turn::user(format!("T{i}")));
        }

        let history = store.get(&id);
        let expected: Vec<String> = (3..=12).map(|i| format!("T{i}")).collect();
        assert_eq!(history.len(), 10);
        assert_eq!(texts(&history), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn append_exchange_keeps_user_then_assistant() {
        let store = InMemoryContextStore::new(10);
        let id = chat(42);
        store.append_exchange(&id, Turn::user("Hello"), Turn::assistant("Hi there!"));

        let history = store.get(&id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text, "Hello");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].text, "Hi there!");
    }

    #[test]
    fn append_exchange_respects_bound() {
        let store = InMemoryContextStore::new(3);
        let id = chat(1);
        for i in 0..5 {
            store.append_exchange(
                &id,
                Turn::user(format!("q{i}")),
                Turn::assistant(format!("a{i}")),
            );
            assert!(store.get(&id).len() <= 3);
        }
        assert_eq!(texts(&store.get(&id)), vec!["a3", "q4", "a4"]);
    }

    #[test]
    fn reset_clears_history_and_keeps_entry() {
        let store = InMemoryContextStore::new(10);
        let id = chat(1);
        store.append(&id, Turn::user("Hello"));
        store.reset(&id);

        assert!(store.get(&id).is_empty());
        assert_eq!(store.chat_count(), 1);

        store.append(&id, Turn::user("Again"));
        assert_eq!(texts(&store.get(&id)), vec!["Again"]);
    }

    #[test]
    fn reset_is_idempotent_and_ok_for_unseen_chats() {
        let store = InMemoryContextStore::new(10);
        store.reset(&chat(99));
        store.reset(&chat(99));
        assert!(store.get(&chat(99)).is_empty());
    }

    #[test]
    fn chats_are_isolated() {
        let store = InMemoryContextStore::new(10);
        store.append(&chat(1), Turn::user("for one"));
        store.append(&chat(2), Turn::user("for two"));
        store.reset(&chat(2));

        assert_eq!(texts(&store.get(&chat(1))), vec!["for one"]);
        assert!(store.get(&chat(2)).is_empty());
    }

    #[test]
    fn zero_bound_keeps_no_history() {
        let store = InMemoryContextStore::new(0);
        store.append_exchange(&chat(1), Turn::user("q"), Turn::assistant("a"));
        assert!(store.get(&chat(1)).is_empty());
    }

    #[test]
    fn very_large_bound_stores_turns_without_preallocating() {
        let store = InMemoryContextStore::new(100_000_000_000);
        store.append(&chat(1), Turn::user("Hello"));
        store.append_exchange(&chat(2), Turn::user("q"), Turn::assistant("a"));
        assert_eq!(store.get(&chat(1)).len(), 1);
        assert_eq!(store.get(&chat(2)).len(), 2);
        assert_eq!(store.max_context_size(), 100_000_000_000);
    }

    #[test]
    fn concurrent_appends_to_different_chats_do_not_leak() {
        let store = Arc::new(InMemoryContextStore::new(10));
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.append(&chat(n), Turn::user(format!("{n}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for n in 0..8 {
            let history = store.get(&chat(n));
            assert_eq!(history.len(), 10);
            assert!(history.iter().all(|t| t.text.starts_with(&format!("{n}-"))));
        }
    }

    #[test]
    fn debug_impl() {
        let store = InMemoryContextStore::new(5);
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryContextStore"));
        assert!(debug.contains("max_context_size"));
    }
}
