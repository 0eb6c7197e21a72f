//! Task polling utilities for the frame loop.
//!
//! All async work (API calls, room setup) runs on the tokio runtime; the
//! frame loop polls the handles once per frame instead of awaiting.

use futures::FutureExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll (task was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task completed with result (may be Ok or join error)
    Complete(Result<T, tokio::task::JoinError>),
}

/// Poll an optional task handle and return its result if finished.
///
/// Encapsulates the pattern of checking for a handle, checking
/// `is_finished()`, then taking ownership and extracting the result with
/// `now_or_never()`.
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task else {
        return PollResult::NoTask;
    };

    if !handle.is_finished() {
        return PollResult::Pending;
    }

    let handle = task.take().unwrap();
    match handle.now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            // Shouldn't happen since we checked is_finished()
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}

/// One-shot timer polled by the frame loop. Used for the delayed automatic
/// song fetch after entering a room.
#[derive(Debug, Default)]
pub struct Delay {
    due: Option<Instant>,
}

impl Delay {
    pub fn idle() -> Self {
        Self { due: None }
    }

    pub fn arm(&mut self, after: Duration) {
        self.due = Some(Instant::now() + after);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once, on the first poll after the deadline passes.
    pub fn fired(&mut self) -> bool {
        match self.due {
            Some(due) if Instant::now() >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
