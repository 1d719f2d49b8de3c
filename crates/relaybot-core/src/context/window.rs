//! Fixed-capacity sliding window of conversation turns.
//!
//! Turns are kept in insertion order. Once the window is full, each push
//! evicts exactly one turn from the front.

use std::collections::VecDeque;

use relaybot_types::chat::Turn;

/// Turns preallocated per window; the deque grows on demand past this.
const INITIAL_SLOTS: usize = 16;

/// Bounded FIFO of turns for a single chat.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl ContextWindow {
    /// Create an empty window holding at most `capacity` turns.
    ///
    /// Storage grows with the turns actually held, not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity.min(INITIAL_SLOTS)),
        }
    }

    /// Append a turn, returning the evicted oldest turn if the window was full.
    ///
    /// With a capacity of zero the pushed turn itself is returned.
    pub fn push(&mut self, turn: Turn) -> Option<Turn> {
        if self.capacity == 0 {
            return Some(turn);
        }
        let evicted = if self.turns.len() == self.capacity {
            self.turns.pop_front()
        } else {
            None
        };
        self.turns.push_back(turn);
        evicted
    }

    /// Turns oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// Owned copy of the turns, oldest-first.
    pub fn to_vec(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
