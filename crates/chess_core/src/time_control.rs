//! Per-move search limits and the shared clock/stop handle.
//!
//! A [`TimeControl`] is handed to the search by value but every clone points
//! at the same start instant and stop flag, which is how `stop` from the
//! protocol thread reaches a search running elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// What one `search` call may spend.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Nominal depth in plies
    pub depth: u8,
    /// Quiescence plies; `None` defers to the engine's configuration
    pub quiescence_depth: Option<u8>,
    /// Wall-clock budget, `None` for unlimited
    pub move_time: Option<Duration>,
    pub time_control: TimeControl,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self::build(depth, None)
    }

    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self::build(depth, Some(move_time))
    }

    fn build(depth: u8, move_time: Option<Duration>) -> Self {
        Self {
            depth,
            quiescence_depth: None,
            move_time,
            time_control: TimeControl::new(move_time),
        }
    }

    pub fn with_quiescence_depth(mut self, depth: u8) -> Self {
        self.quiescence_depth = Some(depth);
        self
    }

    /// Start the clock and clear any earlier stop request.
    pub fn start(&self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(6)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    started_at: Arc<RwLock<Option<Instant>>>,
    budget: Option<Duration>,
}

impl TimeControl {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            started_at: Arc::new(RwLock::new(None)),
            budget,
        }
    }

    fn started_at(&self) -> Option<Instant> {
        *self
            .started_at
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) {
        *self
            .started_at
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// True once any clone has been started.
    pub fn is_started(&self) -> bool {
        self.started_at().is_some()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// The raw flag, polled by search workers without touching the lock.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    /// `start + budget`, or `None` when unlimited, not yet started, or too
    /// far in the future for the platform clock.
    pub fn deadline(&self) -> Option<Instant> {
        self.started_at()?.checked_add(self.budget?)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
