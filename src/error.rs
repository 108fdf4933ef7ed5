//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Boxed Error ==
/// Boxed error type accepted from fallible loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Config Error Enum ==
/// Raised by [`CaskBuilder::build`](crate::CaskBuilder::build) when the
/// configuration is incomplete or invalid. No partial engine is returned.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No TTL was configured
    #[error("ttl must be set")]
    MissingTtl,

    /// TTL was configured as zero
    #[error("ttl must be greater than zero")]
    ZeroTtl,

    /// No maximum size was configured
    #[error("max_size must be set")]
    MissingMaxSize,

    /// Maximum size was configured as zero
    #[error("max_size must be greater than 0")]
    ZeroMaxSize,

    /// No loader was configured
    #[error("loader must be set")]
    MissingLoader,

    /// Custom eviction policy selected without a strategy
    #[error("custom eviction policy requires a strategy")]
    MissingStrategy,

    /// Neither the shared GC executor nor a custom one was chosen
    #[error("gc executor must be shared or explicitly provided")]
    MissingGcExecutor,

    /// The shared GC runtime could not be started
    #[error("failed to start the shared gc runtime")]
    Runtime(#[from] std::io::Error),
}

// == Load Error ==
/// A loader failure surfaced through `get` or `refresh`.
///
/// The failure propagates synchronously to the caller and the store is left
/// unchanged, so a failed load never poisons the cache with a placeholder.
#[derive(Error, Debug)]
#[error("loader failed: {source}")]
pub struct LoadError {
    #[from]
    source: BoxError,
}
