//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single stored unit: the value plus creation and last-access timestamps.
///
/// The value is an `Option` because a cache built with `allow_null_values`
/// may store absent values; under the default configuration only `Some`
/// values are ever written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, `None` only when null values are allowed
    pub value: Option<V>,
    /// Creation timestamp, the anchor for TTL expiry
    pub created_at: Instant,
    /// Timestamp of the most recent live hit
    pub last_accessed_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry timestamped at the current instant.
    pub fn new(value: Option<V>) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
        }
    }

    // == Touch ==
    /// Records a live hit.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed_at = now;
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry is expired as soon as its age is greater
    /// than or equal to the TTL, so an entry whose TTL has fully elapsed is
    /// treated as a miss immediately.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }

    // == Age ==
    /// Time elapsed since the entry was created.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}
