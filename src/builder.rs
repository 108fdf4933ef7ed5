//! Builder Module
//!
//! Validates and assembles configuration into a running cache engine.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::debug;

use crate::cache::{CacheStore, EvictionCallback, EvictionPolicy, EvictionStrategy};
use crate::cask::{Cask, Loader};
use crate::error::{BoxError, ConfigError};
use crate::runtime::GcExecutor;
use crate::tasks::{spawn_sweep_task, DEFAULT_SWEEP_INTERVAL};

// == Cask Builder ==
/// Chainable configuration for a [`Cask`].
///
/// `ttl`, `max_size`, a loader and a GC executor choice are required;
/// everything else has a default. Consumed by [`build`](Self::build), which
/// either returns a running engine or a [`ConfigError`] with nothing
/// started.
///
/// ```no_run
/// use std::time::Duration;
/// use cask::Cask;
///
/// let cache = Cask::<u32, String>::builder()
///     .ttl(Duration::from_secs(30))
///     .max_size(1000)
///     .loader(|id| Some(format!("user:{id}")))
///     .share_gc_executor()
///     .build()?;
/// # Ok::<(), cask::ConfigError>(())
/// ```
pub struct CaskBuilder<K, V> {
    ttl: Option<Duration>,
    max_size: Option<usize>,
    loader: Option<Loader<K, V>>,
    on_evict: Option<EvictionCallback<K, V>>,
    allow_nulls: bool,
    policy: EvictionPolicy,
    strategy: Option<Arc<dyn EvictionStrategy<K, V>>>,
    gc: GcExecutor,
    sweep_interval: Duration,
}

impl<K, V> CaskBuilder<K, V> {
    pub fn new() -> Self {
        Self {
            ttl: None,
            max_size: None,
            loader: None,
            on_evict: None,
            allow_nulls: false,
            policy: EvictionPolicy::default(),
            strategy: None,
            gc: GcExecutor::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Maximum entry age, measured from creation. Required, must be nonzero.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Size bound enforced on insert. Required, must be greater than zero.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Infallible load-on-miss function. `None` means the source has no
    /// value for the key.
    pub fn loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&K) -> Option<V> + Send + Sync + 'static,
    {
        self.loader = Some(Arc::new(move |key| Ok(loader(key))));
        self
    }

    /// Fallible load-on-miss function; errors surface to the `get` or
    /// `refresh` caller.
    pub fn try_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&K) -> Result<Option<V>, BoxError> + Send + Sync + 'static,
    {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Callback for policy- and TTL-driven removals. Not invoked for
    /// explicit `invalidate` or `clear`.
    pub fn on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: Fn(&K, Option<&V>) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(on_evict));
        self
    }

    /// Permits caching absent values via `put`.
    pub fn allow_null_values(mut self) -> Self {
        self.allow_nulls = true;
        self
    }

    /// Size-eviction policy. Defaults to LRU.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Strategy consulted under [`EvictionPolicy::Custom`].
    pub fn eviction_strategy<S>(mut self, strategy: S) -> Self
    where
        S: EvictionStrategy<K, V> + 'static,
    {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Runs the expiry sweep on the process-wide shared runtime.
    pub fn share_gc_executor(mut self) -> Self {
        self.gc = GcExecutor::Shared;
        self
    }

    /// Runs the expiry sweep on a caller-supplied runtime handle.
    pub fn gc_executor(mut self, handle: Handle) -> Self {
        self.gc = GcExecutor::Custom(handle);
        self
    }

    /// Interval between expiry sweep passes. Defaults to
    /// [`DEFAULT_SWEEP_INTERVAL`](crate::DEFAULT_SWEEP_INTERVAL).
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl<K, V> CaskBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Build ==
    /// Validates the configuration, spawns the sweeper and returns the
    /// engine. Rebuilding equivalent state yields independent engines.
    pub fn build(self) -> Result<Cask<K, V>, ConfigError> {
        let ttl = self.ttl.ok_or(ConfigError::MissingTtl)?;
        if ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }
        let max_size = self.max_size.ok_or(ConfigError::MissingMaxSize)?;
        if max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        let loader = self.loader.ok_or(ConfigError::MissingLoader)?;
        if self.policy == EvictionPolicy::Custom && self.strategy.is_none() {
            return Err(ConfigError::MissingStrategy);
        }
        let handle = self.gc.resolve()?;

        let store = Arc::new(Mutex::new(CacheStore::new(
            max_size,
            self.policy,
            self.strategy,
            self.on_evict,
        )));
        let sweeper = spawn_sweep_task(Arc::clone(&store), ttl, self.sweep_interval, &handle);

        debug!(
            ttl_ms = ttl.as_millis() as u64,
            max_size,
            policy = ?self.policy,
            "cask built"
        );

        Ok(Cask::new(store, ttl, self.allow_nulls, loader, sweeper))
    }
}

impl<K, V> Default for CaskBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
