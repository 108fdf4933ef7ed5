//! Cache Module
//!
//! The entry store, eviction policies and the ordered container behind them.

mod entry;
mod order;
mod policy;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::OrderTracker;
pub use policy::{EvictionPolicy, EvictionStrategy};
pub use store::{CacheStore, EvictionCallback};
