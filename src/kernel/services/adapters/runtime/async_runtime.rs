use crate::kernel::services::ports::{AsyncExecutor, BoxFuture};
use std::io;

/// Tokio runtime that executes kernel effects off the caller's thread.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
}

impl AsyncRuntime {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime })
    }
}

impl AsyncExecutor for AsyncRuntime {
    fn spawn(&self, task: BoxFuture) {
        self.runtime.spawn(task);
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;
