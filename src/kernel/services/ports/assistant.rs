//! Assistant backend contract.
//!
//! The kernel only formats requests and parses responses; the network call
//! lives behind [`AssistantBridge`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_to_modify: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
            code_to_modify: None,
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// The exact snippet a modification request targets.
    pub fn with_code_to_modify(mut self, code: impl Into<String>) -> Self {
        self.code_to_modify = Some(code.into());
        self
    }
}

/// `200 {response}`; a 200 without `response` is a malformed reply.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// `4xx/5xx {error, details?}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service error ({status}): {message}")]
    Service {
        status: u16,
        message: String,
        details: Option<String>,
    },
}

pub trait AssistantBridge: Send + Sync {
    /// Blocking call; never retried by the caller.
    fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError>;

    /// `true` when the backend answered its health endpoint with 200.
    fn health(&self) -> bool;
}
