//! Fixed-size worker pool draining a FIFO job queue.
//!
//! One mutex guards the queue, the count of running jobs and the shutdown
//! flag. A single condition variable is signaled on submit, on job
//! completion and on shutdown; idle workers and [`WorkerPool::wait_all`]
//! both wait on it and re-check their own predicate.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::SearchError;

/// Deep quiescence lines recurse far past the nominal depth.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct State {
    queue: VecDeque<Job>,
    active: usize,
    shutdown: bool,
}

struct Shared {
    state: Mutex<State>,
    signal: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a job finished even if it unwinds.
struct ActiveGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.active -= 1;
        drop(state);
        self.shared.signal.notify_all();
    }
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `threads` workers (at least one).
    pub fn new(threads: usize) -> Result<Self, SearchError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                active: 0,
                shutdown: false,
            }),
            signal: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::new(),
        };
        for id in 0..threads.max(1) {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("search-worker-{id}"))
                .stack_size(WORKER_STACK_SIZE)
                .spawn(move || worker_loop(&shared))
                .map_err(SearchError::Spawn)?;
            pool.workers.push(handle);
        }
        debug!(threads = pool.workers.len(), "worker pool started");
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job. It runs on the first idle worker.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.lock().queue.push_back(Box::new(job));
        self.shared.signal.notify_all();
    }

    /// Block until the queue is empty and no job is running.
    pub fn wait_all(&self) {
        let mut state = self.shared.lock();
        while !state.queue.is_empty() || state.active > 0 {
            state = self
                .shared
                .signal
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut state = shared.lock();
            loop {
                if let Some(job) = state.queue.pop_front() {
                    state.active += 1;
                    break job;
                }
                if state.shutdown {
                    return;
                }
                state = shared
                    .signal
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        let _guard = ActiveGuard { shared };
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            warn!("search job panicked");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.signal.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod pool_tests;
