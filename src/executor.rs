//! Execution contexts for directory lookups.
//!
//! The resolver hands every lookup to an [`Executor`] so the host decides
//! whether work runs inline or on a worker pool.

use std::panic::{self, AssertUnwindSafe};

use tokio::runtime::Handle;
use tracing::warn;

use crate::errors::{MentionError, Result};

/// A unit of work submitted to an executor.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Accepts units of work for execution.
///
/// Implementations may run tasks inline, in parallel, or serialized. An `Err`
/// means the task was not accepted and will never run.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task) -> Result<()>;
}

/// Runs every task inline on the submitting thread.
///
/// Useful for tests and for hosts that are already on a worker thread. A
/// panicking task is caught here and never unwinds into the submitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectExecutor;

impl Executor for DirectExecutor {
    fn execute(&self, task: Task) -> Result<()> {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            warn!("inline task panicked");
        }
        Ok(())
    }
}

/// Runs tasks on tokio's blocking thread pool.
#[derive(Debug, Clone)]
pub struct BlockingExecutor {
    handle: Handle,
}

impl BlockingExecutor {
    /// Creates an executor bound to the runtime the caller is running in.
    ///
    /// Fails with a dispatch error when called outside a tokio runtime.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| MentionError::Dispatch {
            message: format!("no tokio runtime available: {e}"),
        })?;
        Ok(Self { handle })
    }

    /// Creates an executor bound to an explicit runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Executor for BlockingExecutor {
    fn execute(&self, task: Task) -> Result<()> {
        // Detached: completion is reported through the task itself.
        drop(self.handle.spawn_blocking(task));
        Ok(())
    }
}
