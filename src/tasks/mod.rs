//! Background Tasks Module
//!
//! Periodic maintenance tasks that run alongside the cache.

mod sweeper;

pub use sweeper::DEFAULT_SWEEP_INTERVAL;
pub(crate) use sweeper::spawn_sweep_task;
