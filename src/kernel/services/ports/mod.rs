//! Service ports: traits + data contracts.

pub mod assistant;
pub mod runtime;
pub mod settings;

pub use assistant::{
    AssistantBridge, AssistantError, ErrorBody, GenerateRequest, GenerateResponse,
};
pub use runtime::{AsyncExecutor, BoxFuture};
pub use settings::{AssistantSettings, Preferences, Settings, Theme};
