//! Cask Engine Module
//!
//! The cache engine: store, policy, loader and sweeper composed behind a
//! small synchronous API.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::builder::CaskBuilder;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::{BoxError, LoadError};

// == Loader ==
/// The load-on-miss function. `Ok(None)` means the backing source has no
/// value for the key; errors propagate to the caller.
pub(crate) type Loader<K, V> = Arc<dyn Fn(&K) -> Result<Option<V>, BoxError> + Send + Sync>;

// == Cask ==
/// An in-process key-value cache with TTL expiry, bounded eviction and a
/// pluggable load-on-miss function.
///
/// Built through [`CaskBuilder`]. The engine owns its store exclusively;
/// all operations take one exclusive lock per call, except the loader
/// invocation which always runs with the lock released. The background
/// expiry sweep is aborted when the engine drops.
///
/// Concurrent misses on the same key are not deduplicated: both callers may
/// invoke the loader and the later write wins. Wrap the loader if stampede
/// protection is required.
pub struct Cask<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    ttl: Duration,
    allow_nulls: bool,
    loader: Loader<K, V>,
    sweeper: JoinHandle<()>,
}

impl<K, V> Cask<K, V> {
    /// Starts a new builder.
    pub fn builder() -> CaskBuilder<K, V> {
        CaskBuilder::new()
    }
}

impl<K, V> Cask<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    pub(crate) fn new(
        store: Arc<Mutex<CacheStore<K, V>>>,
        ttl: Duration,
        allow_nulls: bool,
        loader: Loader<K, V>,
        sweeper: JoinHandle<()>,
    ) -> Self {
        Self {
            store,
            ttl,
            allow_nulls,
            loader,
            sweeper,
        }
    }

    // == Get ==
    /// Looks up a value, loading it on miss.
    ///
    /// A stored entry younger than the TTL is a hit: its last-access
    /// timestamp is refreshed and a clone of the value returned. Anything
    /// else, absent or expired, invokes the loader with the lock released.
    /// A loaded value is written back with a fresh creation time, replacing
    /// any stale entry; a `None` from the loader is returned without
    /// touching the store.
    pub fn get(&self, key: &K) -> Result<Option<V>, LoadError> {
        let now = Instant::now();
        {
            let mut store = self.store.lock();
            let hit = match store.lookup(key) {
                Some(entry) if !entry.is_expired(self.ttl, now) => Some(entry.value.clone()),
                _ => None,
            };
            if let Some(value) = hit {
                store.touch(key, now);
                return Ok(value);
            }
        }

        // The load may be slow (DB or network bound); never hold the lock
        // across it.
        let loaded = (self.loader)(key)?;
        let Some(value) = loaded else {
            return Ok(None);
        };

        let mut store = self.store.lock();
        store.insert_or_update(key.clone(), CacheEntry::new(Some(value.clone())));
        Ok(Some(value))
    }

    // == Put ==
    /// Stores a value with a fresh creation time.
    ///
    /// `None` under the default configuration is a silent no-op; with
    /// `allow_null_values` the absent value is cached like any other.
    pub fn put(&self, key: K, value: Option<V>) {
        if value.is_none() && !self.allow_nulls {
            return;
        }
        let mut store = self.store.lock();
        store.insert_or_update(key, CacheEntry::new(value));
    }

    // == Invalidate ==
    /// Unconditional removal. The eviction callback is not fired.
    pub fn invalidate(&self, key: &K) {
        let mut store = self.store.lock();
        let _ = store.remove(key);
    }

    // == Clear ==
    /// Removes every entry. The eviction callback is not fired.
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.remove_all();
    }

    // == Refresh ==
    /// Reloads a key unconditionally, bypassing the TTL check.
    ///
    /// A loaded value overwrites the entry; a `None` from the loader leaves
    /// the store untouched.
    pub fn refresh(&self, key: &K) -> Result<(), LoadError> {
        let Some(value) = (self.loader)(key)? else {
            return Ok(());
        };
        let mut store = self.store.lock();
        store.insert_or_update(key.clone(), CacheEntry::new(Some(value)));
        Ok(())
    }

    // == Size ==
    /// Current entry count.
    pub fn size(&self) -> usize {
        self.store.lock().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<K, V> Drop for Cask<K, V> {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

impl<K, V> fmt::Debug for Cask<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cask")
            .field("ttl", &self.ttl)
            .field("allow_nulls", &self.allow_nulls)
            .finish_non_exhaustive()
    }
}
