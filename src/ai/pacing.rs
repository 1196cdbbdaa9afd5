use std::sync::Arc;

use log::warn;
use parking_lot::{Condvar, Mutex};
use web_time::{Duration, Instant};

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared flag that cuts a pacing delay short. Once cancelled it stays
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *self.state.cancelled.lock() = true;
        self.state.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.cancelled.lock()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingOutcome {
    Elapsed,
    Cancelled,
}

/// A scheduled delay before an automated move is surfaced.
///
/// Browser callers poll [`Pacing::remaining`]; threaded callers may block in
/// [`Pacing::wait`]. Neither holds any session lock.
#[derive(Debug, Clone)]
pub struct Pacing {
    delay: Duration,
    deadline: Instant,
    token: CancelToken,
}

impl Pacing {
    pub fn start(delay: Duration, token: CancelToken) -> Self {
        Self {
            delay,
            deadline: Instant::now() + delay,
            token,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_ready(&self) -> bool {
        self.is_cancelled() || self.remaining().is_zero()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Blocks until the deadline passes or the token is cancelled.
    pub fn wait(&self) -> PacingOutcome {
        let mut cancelled = self.token.state.cancelled.lock();
        loop {
            if *cancelled {
                warn!("pacing delay of {:?} cancelled", self.delay);
                return PacingOutcome::Cancelled;
            }
            let remaining = self.remaining();
            if remaining.is_zero() {
                return PacingOutcome::Elapsed;
            }
            self.token.state.wake.wait_for(&mut cancelled, remaining);
        }
    }
}
