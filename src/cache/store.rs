//! Cache Store Module
//!
//! The ordered entry container plus the eviction decision applied on insert.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, EvictionPolicy, EvictionStrategy, OrderTracker};

// == Eviction Callback ==
/// Invoked with the evicted key and its last-held value after a policy- or
/// TTL-driven removal. Explicit `invalidate`/`clear` never fire it.
pub type EvictionCallback<K, V> = Arc<dyn Fn(&K, Option<&V>) + Send + Sync>;

// == Cache Store ==
/// Ordered mapping from keys to [`CacheEntry`] values.
///
/// A hash index holds the entries and an [`OrderTracker`] maintains the
/// eviction order: access order under LRU, insertion order otherwise. The
/// size bound is enforced on insert whenever the policy is not
/// [`EvictionPolicy::None`]; under `None` the store grows unbounded except
/// by TTL expiry or explicit removal.
///
/// The store owns the eviction callback and the custom strategy so every
/// synthesized eviction fires the callback after the entry is removed.
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Eviction candidate order
    order: OrderTracker<K>,
    /// Active size-eviction policy
    policy: EvictionPolicy,
    /// Maximum number of entries, enforced unless the policy is `None`
    max_size: usize,
    /// Candidate vote for the custom policy
    strategy: Option<Arc<dyn EvictionStrategy<K, V>>>,
    /// Callback for policy- and TTL-driven removals
    on_evict: Option<EvictionCallback<K, V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    pub fn new(
        max_size: usize,
        policy: EvictionPolicy,
        strategy: Option<Arc<dyn EvictionStrategy<K, V>>>,
        on_evict: Option<EvictionCallback<K, V>>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            order: OrderTracker::new(),
            policy,
            max_size,
            strategy,
            on_evict,
        }
    }

    // == Insert Or Update ==
    /// Inserts or replaces an entry, then applies the eviction check.
    ///
    /// Only the insertion of a new key runs the eviction check; a replace
    /// cannot grow the store. A replace reorders only under LRU, matching
    /// the insertion-order semantics of the other policies.
    pub fn insert_or_update(&mut self, key: K, entry: CacheEntry<V>) {
        let existed = self.entries.insert(key.clone(), entry).is_some();
        if !existed {
            self.order.touch(key);
            self.evict_if_needed();
        } else if self.policy.access_order() {
            self.order.touch(key);
        }
    }

    // == Lookup ==
    /// Returns the entry without mutating order or timestamps. Callers
    /// decide whether to [`touch`](Self::touch).
    pub fn lookup(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Touch ==
    /// Records a live hit: refreshes the last-access timestamp and, under
    /// LRU, moves the key to the front of the order.
    pub fn touch(&mut self, key: &K, now: Instant) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.touch(now);
            if self.policy.access_order() {
                self.order.touch(key.clone());
            }
        }
    }

    // == Remove ==
    /// Explicit removal. Never fires the eviction callback.
    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        self.order.remove(key);
        self.entries.remove(key)
    }

    // == Remove All ==
    /// Explicit removal of every entry. Never fires the eviction callback.
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Sweep Expired ==
    /// Removes every entry whose age has reached `ttl`, firing the eviction
    /// callback for each.
    ///
    /// The scan and the removals happen in one `&mut self` pass, so a
    /// concurrent refresh can never be evicted between scan and removal.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self, ttl: Duration, now: Instant) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.evict(&key);
        }

        count
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Eviction Check ==
    /// Applies the post-insert eviction decision to the single oldest
    /// candidate: evict when over capacity or, under the custom policy,
    /// when the strategy votes yes. Either condition suffices.
    fn evict_if_needed(&mut self) {
        if self.policy == EvictionPolicy::None {
            return;
        }
        let Some(candidate) = self.order.peek_oldest().cloned() else {
            return;
        };
        let over_capacity = self.entries.len() > self.max_size;
        let strategy_vote = match (self.policy, self.strategy.as_ref()) {
            (EvictionPolicy::Custom, Some(strategy)) => self
                .entries
                .get(&candidate)
                .is_some_and(|entry| strategy.should_evict(&self.entries, &candidate, entry)),
            _ => false,
        };
        if over_capacity || strategy_vote {
            self.evict(&candidate);
        }
    }

    // == Evict ==
    /// Policy- or TTL-driven removal. The callback observes the store only
    /// after the entry is gone.
    fn evict(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.order.remove(key);
            if let Some(on_evict) = &self.on_evict {
                on_evict(key, entry.value.as_ref());
            }
        }
    }
}

impl<K, V> fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.len())
            .field("max_size", &self.max_size)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn bounded(max_size: usize, policy: EvictionPolicy) -> CacheStore<String, String> {
        CacheStore::new(max_size, policy, None, None)
    }

    fn insert(store: &mut CacheStore<String, String>, key: &str, value: &str) {
        store.insert_or_update(key.to_string(), CacheEntry::new(Some(value.to_string())));
    }

    fn value_of(store: &CacheStore<String, String>, key: &str) -> Option<String> {
        store
            .lookup(&key.to_string())
            .and_then(|entry| entry.value.clone())
    }

    #[test]
    fn test_store_new() {
        let store = bounded(100, EvictionPolicy::Lru);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = bounded(100, EvictionPolicy::Lru);

        insert(&mut store, "key1", "value1");

        assert_eq!(value_of(&store, "key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_nonexistent() {
        let store = bounded(100, EvictionPolicy::Lru);
        assert!(store.lookup(&"nonexistent".to_string()).is_none());
    }

    #[test]
    fn test_store_overwrite_keeps_size() {
        let mut store = bounded(100, EvictionPolicy::Lru);

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key1", "value2");

        assert_eq!(value_of(&store, "key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = bounded(3, EvictionPolicy::Lru);

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");
        insert(&mut store, "key4", "value4");

        assert_eq!(store.len(), 3);
        assert!(store.lookup(&"key1".to_string()).is_none());
        assert!(store.lookup(&"key4".to_string()).is_some());
    }

    #[test]
    fn test_store_lru_touch_protects_entry() {
        let mut store = bounded(3, EvictionPolicy::Lru);

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");

        store.touch(&"key1".to_string(), Instant::now());

        insert(&mut store, "key4", "value4");

        assert!(store.lookup(&"key1".to_string()).is_some());
        assert!(store.lookup(&"key2".to_string()).is_none());
    }

    #[test]
    fn test_store_fifo_ignores_touch() {
        let mut store = bounded(3, EvictionPolicy::Fifo);

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");

        // Touching under FIFO refreshes the timestamp but not the order
        store.touch(&"key1".to_string(), Instant::now());

        insert(&mut store, "key4", "value4");

        assert!(store.lookup(&"key1".to_string()).is_none());
        assert!(store.lookup(&"key2".to_string()).is_some());
    }

    #[test]
    fn test_store_fifo_overwrite_keeps_position() {
        let mut store = bounded(3, EvictionPolicy::Fifo);

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");

        // Overwriting key1 does not move it to the back of the queue
        insert(&mut store, "key1", "fresh");
        insert(&mut store, "key4", "value4");

        assert!(store.lookup(&"key1".to_string()).is_none());
        assert!(store.lookup(&"key2".to_string()).is_some());
    }

    #[test]
    fn test_store_none_policy_grows_unbounded() {
        let mut store = bounded(2, EvictionPolicy::None);

        for i in 0..10 {
            insert(&mut store, &format!("key{i}"), "value");
        }

        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_store_eviction_callback_fires_after_removal() {
        let observed: Arc<Mutex<Vec<(String, Option<String>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let on_evict: EvictionCallback<String, String> = Arc::new(move |key, value| {
            sink.lock()
                .expect("sink lock")
                .push((key.clone(), value.cloned()));
        });

        let mut store: CacheStore<String, String> =
            CacheStore::new(2, EvictionPolicy::Lru, None, Some(on_evict));

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");

        let events = observed.lock().expect("sink lock");
        assert_eq!(
            events.as_slice(),
            &[("key1".to_string(), Some("value1".to_string()))]
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_explicit_remove_skips_callback() {
        let evictions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evictions);
        let on_evict: EvictionCallback<String, String> = Arc::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut store: CacheStore<String, String> =
            CacheStore::new(10, EvictionPolicy::Lru, None, Some(on_evict));

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");

        assert!(store.remove(&"key1".to_string()).is_some());
        store.remove_all();

        assert_eq!(evictions.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_custom_strategy_evicts_below_capacity() {
        let strategy = |_: &HashMap<String, CacheEntry<String>>,
                        candidate: &String,
                        _: &CacheEntry<String>| candidate.starts_with("tmp:");

        let mut store: CacheStore<String, String> = CacheStore::new(
            10,
            EvictionPolicy::Custom,
            Some(Arc::new(strategy)),
            None,
        );

        insert(&mut store, "tmp:1", "scratch");
        // Inserting a second key makes tmp:1 the oldest candidate
        insert(&mut store, "solid:1", "kept");

        assert!(store.lookup(&"tmp:1".to_string()).is_none());
        assert!(store.lookup(&"solid:1".to_string()).is_some());
    }

    #[test]
    fn test_store_custom_strategy_size_check_still_applies() {
        let strategy =
            |_: &HashMap<String, CacheEntry<String>>, _: &String, _: &CacheEntry<String>| false;

        let mut store: CacheStore<String, String> = CacheStore::new(
            2,
            EvictionPolicy::Custom,
            Some(Arc::new(strategy)),
            None,
        );

        insert(&mut store, "key1", "value1");
        insert(&mut store, "key2", "value2");
        insert(&mut store, "key3", "value3");

        // Strategy said no, but the size bound evicts the oldest anyway
        assert_eq!(store.len(), 2);
        assert!(store.lookup(&"key1".to_string()).is_none());
    }

    #[test]
    fn test_store_sweep_expired() {
        let evictions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evictions);
        let on_evict: EvictionCallback<String, String> = Arc::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut store: CacheStore<String, String> =
            CacheStore::new(10, EvictionPolicy::Lru, None, Some(on_evict));

        insert(&mut store, "old", "value");
        insert(&mut store, "fresh", "value");

        let ttl = Duration::from_millis(100);
        let now = Instant::now() + Duration::from_millis(150);

        // Backdate "fresh" so only "old" is past the TTL
        store.insert_or_update("fresh".to_string(), CacheEntry {
            value: Some("value".to_string()),
            created_at: now,
            last_accessed_at: now,
        });

        let removed = store.sweep_expired(ttl, now);

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&"old".to_string()).is_none());
        assert_eq!(evictions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_store_sweep_nothing_expired() {
        let mut store = bounded(10, EvictionPolicy::Lru);

        insert(&mut store, "key1", "value1");

        let removed = store.sweep_expired(Duration::from_secs(60), Instant::now());

        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_debug_format() {
        let store = bounded(3, EvictionPolicy::Fifo);
        let rendered = format!("{store:?}");
        assert!(rendered.contains("max_size: 3"));
        assert!(rendered.contains("Fifo"));
    }
}
