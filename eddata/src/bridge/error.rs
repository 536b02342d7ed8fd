//! Query bridge error types

use std::time::Duration;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Error returned for a single submitted query.
///
/// Cloneable so the same failure can be reported to several callers when
/// the worker drains its queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The statement failed to prepare, bind or step.
    #[error("{message} (statement: {statement})")]
    Statement { message: String, statement: String },

    /// The statement ran past the task timeout and was interrupted.
    #[error("query exceeded {}ms and was interrupted (statement: {statement})", timeout.as_millis())]
    Timeout { timeout: Duration, statement: String },

    /// The catalog connection failed and the task was not run.
    #[error("catalog unavailable: {reason}")]
    Unavailable { reason: String },

    /// The submission queue is at capacity.
    #[error("query queue is full")]
    QueueFull,

    /// The bridge has shut down.
    #[error("query bridge has shut down")]
    Closed,

    /// A returned value did not have the expected type.
    #[error("failed to decode column {column}: {reason}")]
    Decode { column: String, reason: String },
}

impl QueryError {
    pub(crate) fn decode(column: &str, reason: impl Into<String>) -> Self {
        QueryError::Decode {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error starting the query bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to spawn query bridge thread: {0}")]
    Spawn(#[source] std::io::Error),
}
