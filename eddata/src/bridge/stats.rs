//! Bridge counters shared between callers and the worker thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// Point-in-time view of bridge activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    /// Tasks that returned rows
    pub completed: u64,
    /// Tasks that failed, including timeouts
    pub failed: u64,
    /// Tasks interrupted by the watchdog
    pub timed_out: u64,
    /// Tasks rejected at submission: queue full or catalog unavailable
    pub rejected: u64,
    /// Tasks waiting in the queue
    pub queue_depth: u64,
    /// Times the connection set was reopened after a fatal error
    pub reopens: u64,
    /// False once the bridge gave up reopening the catalog
    pub available: bool,
}

#[derive(Debug)]
pub(crate) struct BridgeCounters {
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    rejected: AtomicU64,
    queued: AtomicU64,
    reopens: AtomicU64,
    available: AtomicBool,
    failure_reason: Mutex<Option<String>>,
}

impl BridgeCounters {
    pub fn new() -> Self {
        Self {
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            queued: AtomicU64::new(0),
            reopens: AtomicU64::new(0),
            available: AtomicBool::new(true),
            failure_reason: Mutex::new(None),
        }
    }

    pub fn task_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_dequeued(&self) {
        // Saturating so a racing snapshot never underflows
        let _ = self
            .queued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
    }

    pub fn task_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_timed_out(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reopened(&self) {
        self.reopens.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_failed(&self, reason: String) {
        let mut slot = self
            .failure_reason
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(reason);
        self.available.store(false, Ordering::Release);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.failure_reason
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn snapshot(&self) -> BridgeStats {
        BridgeStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            queue_depth: self.queued.load(Ordering::Relaxed),
            reopens: self.reopens.load(Ordering::Relaxed),
            available: self.is_available(),
        }
    }
}
