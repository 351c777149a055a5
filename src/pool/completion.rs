//! Completion counter: the barrier behind `wait_completion`.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Count of jobs submitted but not finished yet
///
/// Incremented once per submit, decremented once per finished job (whatever
/// the job returned). Waiters are woken when the count drops to zero.
#[derive(Debug, Default)]
pub struct CompletionCounter {
    pending: Mutex<usize>,
    zero: Condvar,
}

impl CompletionCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Jobs never run while the lock is held, so poisoning can only come from a
    // panic inside this module; the count itself stays consistent.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a newly submitted job
    pub fn increment(&self) {
        *self.lock() += 1;
    }

    /// Record a finished job, waking waiters when nothing is left
    pub fn decrement(&self) {
        let mut pending = self.lock();
        match pending.checked_sub(1) {
            Some(left) => {
                *pending = left;
                if left == 0 {
                    self.zero.notify_all();
                }
            }
            None => {
                tracing::warn!("completion counter decremented below zero, ignoring");
            }
        }
    }

    /// Number of jobs still pending
    pub fn pending(&self) -> usize {
        *self.lock()
    }

    /// Block until the count reaches zero
    pub fn wait_zero(&self) {
        let mut pending = self.lock();
        while *pending > 0 {
            pending = self
                .zero
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses
    ///
    /// Returns true if the count reached zero.
    pub fn wait_zero_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.lock();
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .zero
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            pending = guard;
        }
        true
    }
}
