//! Errors surfaced by store operations.

use thiserror::Error;

use crate::kernel::services::ports::AssistantError;
use crate::models::{FileTreeError, TargetError};

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("not found")]
    NotFound,
    #[error("invalid target: {0}")]
    InvalidTarget(TargetError),
    #[error("invalid name {0:?}")]
    InvalidName(String),
    #[error("assistant response did not contain a code block")]
    NoCodeBlockFound,
    #[error("the selected code is no longer present in the document")]
    StaleSelection,
    #[error("network error: {0}")]
    Network(String),
    #[error("assistant service error ({status}): {message}")]
    Service {
        status: u16,
        message: String,
        details: Option<String>,
    },
    #[error("assistant is busy with another request")]
    Busy,
    #[error("assistant is unavailable")]
    AssistantUnavailable,
    #[error("no code selected")]
    NoSelection,
    #[error("no pending code edit")]
    NoPendingEdit,
    #[error("invalid search query: {0}")]
    InvalidQuery(String),
}

impl From<FileTreeError> for WorkspaceError {
    fn from(err: FileTreeError) -> Self {
        match err {
            FileTreeError::NotFound => WorkspaceError::NotFound,
            FileTreeError::InvalidTarget(reason) => WorkspaceError::InvalidTarget(reason),
            FileTreeError::InvalidName(name) => WorkspaceError::InvalidName(name),
        }
    }
}

impl From<AssistantError> for WorkspaceError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Network(message) => WorkspaceError::Network(message),
            AssistantError::Service {
                status,
                message,
                details,
            } => WorkspaceError::Service {
                status,
                message,
                details,
            },
        }
    }
}
