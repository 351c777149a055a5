//! Bounded FIFO task channel between the producer and the workers.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use super::job::Job;
use crate::error::{Error, Result};

/// Fixed-capacity FIFO of pending jobs
///
/// `enqueue` blocks while the channel is full; `dequeue_or_timeout` blocks while
/// it is empty, but only up to the given duration. The channel keeps one
/// receiver of its own, so it stays connected for as long as it lives even if
/// every worker has exited.
pub struct TaskChannel {
    tx: Sender<Job>,
    rx: Receiver<Job>,
    capacity: usize,
}

/// Consuming end of a [`TaskChannel`], one per worker
#[derive(Clone)]
pub struct TaskReceiver {
    rx: Receiver<Job>,
}

impl TaskChannel {
    /// Create a channel holding at most `capacity` pending jobs
    ///
    /// A capacity of zero makes a rendezvous channel: every enqueue waits for
    /// a worker to take the job directly.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Handle for a worker
    pub fn receiver(&self) -> TaskReceiver {
        TaskReceiver {
            rx: self.rx.clone(),
        }
    }

    /// Append a job, blocking while the channel is full
    pub fn enqueue(&self, job: Job) -> Result<()> {
        self.tx.send(job).map_err(|_| Error::ChannelClosed)
    }

    /// Take the oldest job, waiting at most `timeout` for one to arrive
    pub fn dequeue_or_timeout(&self, timeout: Duration) -> Option<Job> {
        self.receiver().dequeue_or_timeout(timeout)
    }

    /// Number of jobs waiting in the channel
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// True if no job is waiting
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Maximum number of pending jobs
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl TaskReceiver {
    /// Take the oldest job, waiting at most `timeout` for one to arrive
    ///
    /// Returns `None` when the wait times out (or the channel is gone).
    pub fn dequeue_or_timeout(&self, timeout: Duration) -> Option<Job> {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => Some(job),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
