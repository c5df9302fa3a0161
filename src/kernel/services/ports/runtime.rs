//! Executor contract used by the service host to run effects.

use std::future::Future;
use std::pin::Pin;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs effect futures off the thread that owns the store. Blocking work
/// (HTTP, file writes) is expected to hop onto a blocking pool inside the task.
pub trait AsyncExecutor: Send + Sync {
    fn spawn(&self, task: BoxFuture);
}
