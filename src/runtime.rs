//! Runtime Module
//!
//! The periodic-task capability backing the expiry sweep: either one shared
//! process-wide runtime or a caller-supplied tokio handle.

use std::sync::OnceLock;

use tokio::runtime::{Builder as RuntimeBuilder, Handle, Runtime};

use crate::error::ConfigError;

static SHARED_RUNTIME: OnceLock<Runtime> = OnceLock::new();

// == Gc Executor ==
/// The builder's executor choice. Absence is a build-time error, never a
/// silent default.
#[derive(Debug, Clone, Default)]
pub(crate) enum GcExecutor {
    #[default]
    Unset,
    Shared,
    Custom(Handle),
}

impl GcExecutor {
    /// Resolves the choice into a spawn handle, starting the shared runtime
    /// on first use.
    pub(crate) fn resolve(&self) -> Result<Handle, ConfigError> {
        match self {
            GcExecutor::Unset => Err(ConfigError::MissingGcExecutor),
            GcExecutor::Shared => CaskRuntime::handle(),
            GcExecutor::Custom(handle) => Ok(handle.clone()),
        }
    }
}

// == Cask Runtime ==
/// The process-wide shared GC runtime.
///
/// One single-worker tokio runtime, started lazily and reused by every cache
/// built with `share_gc_executor`. Its worker thread does not keep the
/// process alive once `main` returns.
pub struct CaskRuntime;

impl CaskRuntime {
    /// Returns a handle to the shared runtime, starting it if necessary.
    pub fn handle() -> Result<Handle, ConfigError> {
        if let Some(runtime) = SHARED_RUNTIME.get() {
            return Ok(runtime.handle().clone());
        }

        let runtime = RuntimeBuilder::new_multi_thread()
            .worker_threads(1)
            .thread_name("cask-gc")
            .enable_time()
            .build()?;

        // Another thread may have won the race; either way the stored
        // runtime is the one handed out.
        let runtime = SHARED_RUNTIME.get_or_init(|| runtime);
        Ok(runtime.handle().clone())
    }
}
