//! Order Tracker Module
//!
//! Tracks entry order for eviction candidate selection.

use std::collections::VecDeque;

// == Order Tracker ==
/// Keeps keys ordered from most recent (front) to oldest (back).
///
/// Under LRU the store touches keys on every access, so the back is the
/// least recently used key. Under FIFO and custom policies only new keys
/// are pushed, so the back is the oldest inserted key.
#[derive(Debug, Default)]
pub struct OrderTracker<K> {
    order: VecDeque<K>,
}

impl<K: PartialEq> OrderTracker<K> {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    /// Moves a key to the front, inserting it if absent.
    pub fn touch(&mut self, key: K) {
        self.remove(&key);
        self.order.push_front(key);
    }

    /// Removes a key; absent keys are ignored.
    pub fn remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    /// The eviction candidate: the oldest key by the tracked order.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.back()
    }

    #[allow(dead_code)]
    pub fn pop_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
