//! The bridge worker thread.
//!
//! Owns the [`ConnectionSet`] and runs queued tasks strictly one at a time in
//! arrival order. The worker is also its own supervisor: a fatal catalog
//! error or a panic fails the queue and triggers a reopen of the connection
//! set from its paths.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rusqlite::ErrorCode;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::error::QueryError;
use super::request::{QueryRequest, QueryTask};
use super::stats::BridgeCounters;
use super::watchdog::TaskWatchdog;
use crate::catalog::{CatalogPaths, ConnectionSet, Row, Scalar};

/// Why a task did not return rows.
#[derive(Debug)]
enum TaskFailure {
    Sqlite(rusqlite::Error),
    Binding(String),
    Panic(String),
}

pub(crate) struct Worker {
    connections: Option<ConnectionSet>,
    paths: CatalogPaths,
    receiver: mpsc::Receiver<QueryRequest>,
    watchdog: Option<TaskWatchdog>,
    task_timeout: Option<Duration>,
    counters: Arc<BridgeCounters>,
}

impl Worker {
    pub fn new(
        connections: ConnectionSet,
        receiver: mpsc::Receiver<QueryRequest>,
        task_timeout: Option<Duration>,
        counters: Arc<BridgeCounters>,
    ) -> std::io::Result<Self> {
        let watchdog = match task_timeout {
            Some(_) => Some(TaskWatchdog::start(connections.interrupt_handle())?),
            None => None,
        };
        Ok(Self {
            paths: connections.paths().clone(),
            connections: Some(connections),
            receiver,
            watchdog,
            task_timeout,
            counters,
        })
    }

    /// Runs until every sender is dropped and the queue is empty.
    pub fn run(mut self) {
        info!(
            timeout_ms = self.task_timeout.map(|t| t.as_millis() as u64),
            "Query bridge worker started"
        );

        while let Some(request) = self.receiver.blocking_recv() {
            self.counters.task_dequeued();
            self.handle(request);
        }

        if let Some(mut watchdog) = self.watchdog.take() {
            watchdog.shutdown();
        }
        if let Some(connections) = self.connections.take() {
            if let Err(e) = connections.close() {
                warn!(error = %e, "Failed to close catalog connection set");
            }
        }
        info!("Query bridge worker stopped");
    }

    fn handle(&mut self, request: QueryRequest) {
        let Some(connections) = self.connections.as_ref() else {
            let reason = self
                .counters
                .failure_reason()
                .unwrap_or_else(|| "catalog connection is closed".to_string());
            self.counters.task_rejected();
            request.respond(Err(QueryError::Unavailable { reason }));
            return;
        };

        let waited = request.submitted_at.elapsed();
        let started = Instant::now();
        let generation = match (&self.watchdog, self.task_timeout) {
            (Some(watchdog), Some(timeout)) => Some(watchdog.arm(timeout)),
            _ => None,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            execute(connections, &request.task)
        }))
        .unwrap_or_else(|payload| Err(TaskFailure::Panic(panic_message(payload))));

        let interrupted = match (&self.watchdog, generation) {
            (Some(watchdog), Some(generation)) => watchdog.disarm(generation),
            _ => false,
        };

        match outcome {
            Ok(rows) => {
                debug!(
                    statement = %request.task.compact_statement(),
                    rows = rows.len(),
                    waited_ms = waited.as_millis() as u64,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query completed"
                );
                self.counters.task_completed();
                request.respond(Ok(rows));
            }
            Err(TaskFailure::Sqlite(e))
                if interrupted && e.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) =>
            {
                let timeout = self.task_timeout.unwrap_or_default();
                warn!(
                    statement = %request.task.compact_statement(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Query timed out"
                );
                self.counters.task_timed_out();
                let statement = request.task.compact_statement();
                request.respond(Err(QueryError::Timeout { timeout, statement }));
            }
            Err(TaskFailure::Sqlite(e)) if is_fatal(&e) => {
                let reason = e.to_string();
                error!(error = %e, "Fatal catalog error");
                self.counters.task_failed();
                // Callers observe the bridge state after recovery
                self.recover(&reason);
                let statement = request.task.compact_statement();
                request.respond(Err(QueryError::Statement {
                    message: reason,
                    statement,
                }));
            }
            Err(TaskFailure::Panic(message)) => {
                error!(panic = %message, "Query task panicked");
                self.counters.task_failed();
                let reason = format!("query task panicked: {}", message);
                self.recover(&reason);
                request.respond(Err(QueryError::Unavailable { reason }));
            }
            Err(failure) => {
                let message = match failure {
                    TaskFailure::Sqlite(e) => e.to_string(),
                    TaskFailure::Binding(message) => message,
                    TaskFailure::Panic(message) => message,
                };
                let statement = request.task.compact_statement();
                debug!(%statement, error = %message, "Query failed");
                self.counters.task_failed();
                request.respond(Err(QueryError::Statement { message, statement }));
            }
        }
    }

    /// Fails everything already queued, then reopens the connection set.
    ///
    /// On reopen failure the bridge stays up but every later task is
    /// rejected with [`QueryError::Unavailable`].
    pub(crate) fn recover(&mut self, reason: &str) {
        let drained = self.fail_queued(reason);
        warn!(drained, reason, "Reopening catalog connection set");

        if let Some(watchdog) = &self.watchdog {
            watchdog.set_interrupt(None);
        }
        if let Some(old) = self.connections.take() {
            if let Err(e) = old.close() {
                debug!(error = %e, "Error closing failed connection set");
            }
        }

        match ConnectionSet::open(&self.paths) {
            Ok(connections) => {
                if let Some(watchdog) = &self.watchdog {
                    watchdog.set_interrupt(Some(connections.interrupt_handle()));
                }
                self.connections = Some(connections);
                self.counters.reopened();
                info!("Catalog connection set reopened");
            }
            Err(e) => {
                error!(error = %e, "Failed to reopen catalog, bridge unavailable");
                self.counters.mark_failed(e.to_string());
            }
        }
    }

    /// Rejects every task currently in the queue. Returns how many.
    fn fail_queued(&mut self, reason: &str) -> usize {
        let mut drained = 0;
        while let Ok(request) = self.receiver.try_recv() {
            self.counters.task_dequeued();
            self.counters.task_rejected();
            request.respond(Err(QueryError::Unavailable {
                reason: reason.to_string(),
            }));
            drained += 1;
        }
        drained
    }
}

/// Prepares, binds and steps one task, collecting every row.
fn execute(connections: &ConnectionSet, task: &QueryTask) -> Result<Vec<Row>, TaskFailure> {
    let mut stmt = connections
        .connection()
        .prepare_cached(&task.statement)
        .map_err(TaskFailure::Sqlite)?;

    for index in 1..=stmt.parameter_count() {
        let name = match stmt.parameter_name(index) {
            Some(name) if !name.starts_with('?') => name.to_string(),
            _ => {
                return Err(TaskFailure::Binding(format!(
                    "positional parameter {} is not supported, use a named parameter",
                    index
                )))
            }
        };
        let key = name.trim_start_matches(['@', ':', '$']);
        let value = task
            .params
            .get(key)
            .ok_or_else(|| TaskFailure::Binding(format!("missing named parameter {}", name)))?;
        stmt.raw_bind_parameter(index, value)
            .map_err(TaskFailure::Sqlite)?;
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(TaskFailure::Sqlite)? {
        let mut values = Vec::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            let value = row.get_ref(i).map_err(TaskFailure::Sqlite)?;
            values.push((name.clone(), Scalar::from(value)));
        }
        out.push(Row::new(values));
    }
    Ok(out)
}

/// Errors after which the connection set cannot be trusted.
pub(crate) fn is_fatal(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
        )
    )
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
