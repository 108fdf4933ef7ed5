//! Cask - an embeddable in-process key-value cache
//!
//! Generic key-value caching with TTL expiry, size-bounded eviction
//! (LRU, FIFO or a custom strategy), a pluggable load-on-miss function and
//! a periodic background sweep of expired entries.
//!
//! ```no_run
//! use std::time::Duration;
//! use cask::Cask;
//!
//! let users = Cask::<u32, String>::builder()
//!     .ttl(Duration::from_secs(30))
//!     .max_size(1000)
//!     .loader(|id| Some(format!("user:{id}")))
//!     .share_gc_executor()
//!     .build()?;
//!
//! let name = users.get(&42)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod cache;
mod cask;
mod error;
mod runtime;
mod tasks;

pub use builder::CaskBuilder;
pub use cache::{CacheEntry, EvictionPolicy, EvictionStrategy};
pub use cask::Cask;
pub use error::{BoxError, ConfigError, LoadError};
pub use runtime::CaskRuntime;
pub use tasks::DEFAULT_SWEEP_INTERVAL;
