//! Work items carried over the bridge channel.

use std::time::Instant;

use tokio::sync::oneshot;

use super::error::QueryError;
use crate::catalog::{Params, Row};

/// Result of a single query task.
pub type QueryResult = Result<Vec<Row>, QueryError>;

/// A statement and the named parameters to bind to it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTask {
    pub statement: String,
    pub params: Params,
}

impl QueryTask {
    pub fn new(statement: impl Into<String>, params: Params) -> Self {
        Self {
            statement: statement.into(),
            params,
        }
    }

    /// Statement with runs of whitespace collapsed, for logs and errors.
    pub fn compact_statement(&self) -> String {
        compact(&self.statement)
    }
}

/// A queued task with its completion channel.
pub(crate) struct QueryRequest {
    pub task: QueryTask,
    pub response_tx: oneshot::Sender<QueryResult>,
    pub submitted_at: Instant,
}

impl QueryRequest {
    pub fn new(task: QueryTask) -> (Self, oneshot::Receiver<QueryResult>) {
        let (response_tx, response_rx) = oneshot::channel();
        (
            Self {
                task,
                response_tx,
                submitted_at: Instant::now(),
            },
            response_rx,
        )
    }

    /// Delivers the result. A caller that stopped waiting is not an error.
    pub fn respond(self, result: QueryResult) {
        let _ = self.response_tx.send(result);
    }
}

pub(crate) fn compact(statement: &str) -> String {
    statement.split_whitespace().collect::<Vec<_>>().join(" ")
}
