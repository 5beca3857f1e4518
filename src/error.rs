//! Error types for the call-tree engine
//!
//! Every error here is node-scoped and recoverable by re-interaction:
//! malformed records are skipped, failed fetches leave the node retryable,
//! and stale responses are dropped.

use thiserror::Error;

/// Errors raised by the parser, filter and expansion controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Malformed call record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Failed to fetch subcalls of {id}: {message}")]
    FetchFailure { id: String, message: String },

    #[error("Discarded stale response for {id}")]
    StaleResponse { id: String },

    #[error("Unknown call node: {id}")]
    UnknownNode { id: String },

    #[error("Call node {id} has no subcalls")]
    NoChildren { id: String },

    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TreeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TreeError::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Whether the error should be surfaced to the user
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, TreeError::StaleResponse { .. })
    }
}

/// Result type for call-tree operations
pub type Result<T> = std::result::Result<T, TreeError>;
