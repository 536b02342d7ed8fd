//! Asynchronous bridge to the synchronous catalog connection.
//!
//! SQLite connections are blocking and not shareable across threads, while
//! callers are async tasks that may number in the hundreds. The bridge gives
//! them one serialized execution lane:
//!
//! ```text
//! caller ──submit──► mpsc (bounded) ──► eddata-query-bridge thread ──► ConnectionSet
//!    ▲                                              │
//!    └──────────── oneshot per task ◄───────────────┘
//! ```
//!
//! Tasks run strictly in submission order, one at a time. A failing task
//! only fails itself; a slow one is interrupted by the watchdog after the
//! configured timeout; a fatal catalog error fails the queue and the worker
//! reopens the connection set.
//!
//! # Example
//!
//! ```ignore
//! use eddata::bridge::{BridgeConfig, QueryBridge};
//! use eddata::catalog::{CatalogPaths, Params};
//!
//! let bridge = QueryBridge::start(&CatalogPaths::from_dir(data_dir), BridgeConfig::default())?;
//! let row = bridge
//!     .get(
//!         "SELECT * FROM systems.systems WHERE systemName = @systemName COLLATE NOCASE",
//!         Params::new().with("systemName", "Sol"),
//!     )
//!     .await?;
//! bridge.shutdown();
//! ```

mod error;
mod request;
mod stats;
mod watchdog;
mod worker;

pub use error::{BridgeError, QueryError};
pub use request::{QueryResult, QueryTask};
pub use stats::BridgeStats;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogPaths, ConnectionSet, Params, Row};
use request::QueryRequest;
use stats::BridgeCounters;
use worker::Worker;

/// Default number of tasks that may wait in the queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default per-task timeout.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Bridge tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum queued tasks before submissions fail with `QueueFull`
    pub queue_capacity: usize,
    /// Per-task timeout; `None` disables the watchdog
    pub task_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            task_timeout: Some(DEFAULT_TASK_TIMEOUT),
        }
    }
}

/// Handle to the query bridge worker.
///
/// Cheap to share behind an `Arc`; all methods take `&self` except
/// [`shutdown`](Self::shutdown). Dropping the bridge drains the queue and
/// joins the worker.
pub struct QueryBridge {
    sender: Option<mpsc::Sender<QueryRequest>>,
    counters: Arc<BridgeCounters>,
    worker_handle: Option<JoinHandle<()>>,
}

impl QueryBridge {
    /// Opens the catalog and starts the worker thread.
    pub fn start(paths: &CatalogPaths, config: BridgeConfig) -> Result<Self, BridgeError> {
        let connections = ConnectionSet::open(paths)?;
        Self::with_connections(connections, config)
    }

    /// Starts the worker over an already opened connection set.
    ///
    /// Functions registered on `connections` before this call are available
    /// to tasks until the set is reopened after a fatal error.
    pub fn with_connections(
        connections: ConnectionSet,
        config: BridgeConfig,
    ) -> Result<Self, BridgeError> {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let counters = Arc::new(BridgeCounters::new());

        let worker = Worker::new(
            connections,
            receiver,
            config.task_timeout,
            Arc::clone(&counters),
        )
        .map_err(BridgeError::Spawn)?;

        let worker_handle = thread::Builder::new()
            .name("eddata-query-bridge".to_string())
            .spawn(move || worker.run())
            .map_err(BridgeError::Spawn)?;

        info!(
            queue_capacity = capacity,
            timeout_ms = config.task_timeout.map(|t| t.as_millis() as u64),
            "Query bridge started"
        );

        Ok(Self {
            sender: Some(sender),
            counters,
            worker_handle: Some(worker_handle),
        })
    }

    /// Queues a task without blocking.
    ///
    /// The returned future resolves once the worker has run the task. Queue
    /// and availability errors resolve immediately.
    pub fn submit(&self, task: QueryTask) -> PendingQuery {
        if !self.counters.is_available() {
            self.counters.task_rejected();
            let reason = self
                .counters
                .failure_reason()
                .unwrap_or_else(|| "catalog connection failed".to_string());
            return PendingQuery::failed(QueryError::Unavailable { reason });
        }
        let Some(sender) = &self.sender else {
            return PendingQuery::failed(QueryError::Closed);
        };

        let (request, response_rx) = QueryRequest::new(task);
        // Count before sending so the worker never dequeues an uncounted task
        self.counters.task_queued();
        match sender.try_send(request) {
            Ok(()) => PendingQuery::waiting(response_rx),
            Err(TrySendError::Full(_)) => {
                self.counters.task_dequeued();
                self.counters.task_rejected();
                debug!("Query queue full, rejecting task");
                PendingQuery::failed(QueryError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                self.counters.task_dequeued();
                PendingQuery::failed(QueryError::Closed)
            }
        }
    }

    /// Runs a statement and returns every row.
    pub async fn all(&self, statement: &str, params: Params) -> Result<Vec<Row>, QueryError> {
        self.submit(QueryTask::new(statement, params)).await
    }

    /// Runs a statement and returns the first row, if any.
    pub async fn get(&self, statement: &str, params: Params) -> Result<Option<Row>, QueryError> {
        let rows = self.all(statement, params).await?;
        Ok(rows.into_iter().next())
    }

    pub fn stats(&self) -> BridgeStats {
        self.counters.snapshot()
    }

    /// False once the worker has given up reopening the catalog.
    pub fn is_available(&self) -> bool {
        self.counters.is_available()
    }

    /// Check if the worker thread is still running.
    pub fn is_running(&self) -> bool {
        self.worker_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stops accepting tasks, lets queued tasks finish, and joins the worker.
    ///
    /// Blocks the calling thread until the queue has drained.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel is the stop marker: the worker sees it only
        // after every task queued before it.
        if self.sender.take().is_none() {
            return;
        }
        if let Some(handle) = self.worker_handle.take() {
            if let Err(e) = handle.join() {
                warn!("Query bridge worker panicked: {:?}", e);
            }
        }
        debug!("Query bridge shut down");
    }
}

impl fmt::Debug for QueryBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBridge")
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for QueryBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Future returned by [`QueryBridge::submit`].
pub struct PendingQuery {
    state: PendingState,
}

enum PendingState {
    Waiting(oneshot::Receiver<QueryResult>),
    Failed(Option<QueryError>),
}

impl PendingQuery {
    fn waiting(rx: oneshot::Receiver<QueryResult>) -> Self {
        Self {
            state: PendingState::Waiting(rx),
        }
    }

    fn failed(error: QueryError) -> Self {
        Self {
            state: PendingState::Failed(Some(error)),
        }
    }
}

impl Future for PendingQuery {
    type Output = QueryResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(QueryError::Closed))),
            PendingState::Failed(error) => {
                Poll::Ready(Err(error.take().unwrap_or(QueryError::Closed)))
            }
        }
    }
}
