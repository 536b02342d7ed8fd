//! Task timeout watchdog.
//!
//! Runs on its own thread next to the bridge worker. The worker arms it
//! before each statement and disarms it afterwards; if the deadline passes
//! first, the watchdog interrupts the running SQLite statement, which then
//! fails with `SQLITE_INTERRUPT` on the worker thread.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rusqlite::InterruptHandle;
use tracing::{debug, warn};

struct WatchState {
    interrupt: Option<InterruptHandle>,
    armed: Option<(u64, Instant)>,
    fired: Option<u64>,
    generation: u64,
    shutdown: bool,
}

struct Shared {
    state: Mutex<WatchState>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, WatchState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Interrupts statements that run past their deadline.
pub(crate) struct TaskWatchdog {
    shared: Arc<Shared>,
    thread_handle: Option<JoinHandle<()>>,
}

impl TaskWatchdog {
    pub fn start(interrupt: InterruptHandle) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(WatchState {
                interrupt: Some(interrupt),
                armed: None,
                fired: None,
                generation: 0,
                shutdown: false,
            }),
            wake: Condvar::new(),
        });
        let shared_clone = Arc::clone(&shared);

        let thread_handle = thread::Builder::new()
            .name("eddata-query-watchdog".to_string())
            .spawn(move || Self::run_loop(shared_clone))?;

        Ok(Self {
            shared,
            thread_handle: Some(thread_handle),
        })
    }

    fn run_loop(shared: Arc<Shared>) {
        let mut state = shared.lock();
        loop {
            if state.shutdown {
                break;
            }
            match state.armed {
                None => {
                    state = shared
                        .wake
                        .wait(state)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
                Some((generation, deadline)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        if let Some(interrupt) = &state.interrupt {
                            interrupt.interrupt();
                        }
                        state.armed = None;
                        state.fired = Some(generation);
                        warn!(generation, "Query deadline passed, interrupting statement");
                    } else {
                        state = shared
                            .wake
                            .wait_timeout(state, deadline - now)
                            .map(|(guard, _)| guard)
                            .unwrap_or_else(|poisoned| poisoned.into_inner().0);
                    }
                }
            }
        }
        debug!("Query watchdog stopped");
    }

    /// Starts the clock for the next statement and returns its generation.
    pub fn arm(&self, timeout: Duration) -> u64 {
        let mut state = self.shared.lock();
        state.generation += 1;
        let generation = state.generation;
        state.armed = Some((generation, Instant::now() + timeout));
        state.fired = None;
        self.shared.wake.notify_one();
        generation
    }

    /// Stops the clock. Returns true if the watchdog fired for `generation`.
    pub fn disarm(&self, generation: u64) -> bool {
        let mut state = self.shared.lock();
        if matches!(state.armed, Some((g, _)) if g == generation) {
            state.armed = None;
        }
        state.fired == Some(generation)
    }

    /// Points the watchdog at a freshly opened connection.
    pub fn set_interrupt(&self, interrupt: Option<InterruptHandle>) {
        let mut state = self.shared.lock();
        state.armed = None;
        state.interrupt = interrupt;
    }

    pub fn shutdown(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            self.shared.wake.notify_one();
        }
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                warn!("Query watchdog thread panicked: {:?}", e);
            }
        }
    }
}

impl Drop for TaskWatchdog {
    fn drop(&mut self) {
        self.shutdown();
    }
}
