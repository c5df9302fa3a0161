//! Async runtime adapter: executes effects and sends actions back over the kernel bus.

mod async_runtime;

pub use async_runtime::AsyncRuntime;
