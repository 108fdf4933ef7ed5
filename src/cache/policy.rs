//! Eviction Policy Module
//!
//! The enumerated size-eviction policies and the custom strategy contract.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Eviction Policy ==
/// Selects how the store orders entries and when size-based eviction fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Access order: the least recently read or written entry is evicted
    #[default]
    Lru,
    /// Insertion order: the oldest inserted entry is evicted, irrespective
    /// of access
    Fifo,
    /// Insertion order, with a user-supplied strategy voting on the
    /// candidate in addition to the size check
    Custom,
    /// No size-based eviction; the store is bounded only by TTL expiry and
    /// explicit invalidation
    None,
}

impl EvictionPolicy {
    /// True when a live hit reorders entries.
    pub fn access_order(self) -> bool {
        self == EvictionPolicy::Lru
    }
}

// == Eviction Strategy ==
/// User-supplied eviction vote for [`EvictionPolicy::Custom`].
///
/// Evaluated at insert time against the single oldest-by-order candidate,
/// with a read-only snapshot of the entry map. The default size check still
/// applies; the candidate is evicted when either condition holds.
pub trait EvictionStrategy<K, V>: Send + Sync {
    /// Returns true when `candidate` should be evicted.
    fn should_evict(
        &self,
        entries: &HashMap<K, CacheEntry<V>>,
        candidate: &K,
        entry: &CacheEntry<V>,
    ) -> bool;
}

impl<K, V, F> EvictionStrategy<K, V> for F
where
    F: Fn(&HashMap<K, CacheEntry<V>>, &K, &CacheEntry<V>) -> bool + Send + Sync,
{
    fn should_evict(
        &self,
        entries: &HashMap<K, CacheEntry<V>>,
        candidate: &K,
        entry: &CacheEntry<V>,
    ) -> bool {
        self(entries, candidate, entry)
    }
}
