//! Readiness gate for the vision backend.
//!
//! The in-process primitives are always ready, but callers that load a
//! backend lazily (a worker thread warming up, a plugin being linked) hand the
//! pipeline a pending gate instead. The pipeline checks it once, with a
//! bounded wait, before running any stage.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{DetectError, Result};

/// Give-up window used when the caller has no preference
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
struct Gate {
    state: Mutex<State>,
    changed: Condvar,
}

/// Shared handle to the backend's readiness state
#[derive(Debug, Clone)]
pub struct Backend {
    gate: Arc<Gate>,
}

/// Loading side of a pending [`Backend`]
#[derive(Debug)]
pub struct BackendLoader {
    gate: Arc<Gate>,
}

impl Backend {
    fn with_state(state: State) -> Self {
        Self {
            gate: Arc::new(Gate {
                state: Mutex::new(state),
                changed: Condvar::new(),
            }),
        }
    }

    /// A backend that is usable immediately
    pub fn ready() -> Self {
        Self::with_state(State::Ready)
    }

    /// A backend that becomes usable once the returned loader says so
    pub fn pending() -> (Self, BackendLoader) {
        let backend = Self::with_state(State::Loading);
        let loader = BackendLoader {
            gate: backend.gate.clone(),
        };
        (backend, loader)
    }

    /// Non-blocking check
    pub fn is_ready(&self) -> bool {
        matches!(self.lock_state(), Ok(ref s) if **s == State::Ready)
    }

    /// Block until the backend is ready, it fails, or `timeout` elapses.
    pub fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let guard = self.lock_state()?;

        let (guard, wait) = self
            .gate
            .changed
            .wait_timeout_while(guard, timeout, |s| *s == State::Loading)
            .map_err(|_| poisoned(started.elapsed()))?;

        match &*guard {
            State::Ready => {
                debug!(waited = ?started.elapsed(), "vision backend ready");
                Ok(())
            }
            State::Failed(reason) => Err(DetectError::BackendUnavailable {
                waited: started.elapsed(),
                reason: reason.clone(),
            }),
            State::Loading => {
                debug_assert!(wait.timed_out());
                warn!(?timeout, "gave up waiting for vision backend");
                Err(DetectError::BackendUnavailable {
                    waited: started.elapsed(),
                    reason: "timed out while loading".to_string(),
                })
            }
        }
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.gate.state.lock().map_err(|_| poisoned(Duration::ZERO))
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::ready()
    }
}

impl BackendLoader {
    pub fn mark_ready(self) {
        self.set(State::Ready);
    }

    pub fn mark_failed(self, reason: impl Into<String>) {
        self.set(State::Failed(reason.into()));
    }

    fn set(&self, state: State) {
        // A poisoned lock still holds a usable state; waiters must be released either way
        let mut guard = match self.gate.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = state;
        self.gate.changed.notify_all();
    }
}

impl Drop for BackendLoader {
    fn drop(&mut self) {
        let still_loading = matches!(self.gate.state.lock(), Ok(ref s) if **s == State::Loading);
        if still_loading {
            self.set(State::Failed("loader dropped before the backend was ready".to_string()));
        }
    }
}

fn poisoned(waited: Duration) -> DetectError {
    DetectError::BackendUnavailable {
        waited,
        reason: "readiness state poisoned".to_string(),
    }
}
