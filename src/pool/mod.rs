//! Bounded, self-shrinking worker pool.
//!
//! The pool is built for one batch:
//! - [`channel`] - Bounded FIFO of pending jobs (capacity = worker count)
//! - [`completion`] - Counter behind [`WorkerPool::wait_completion`]
//! - [`job`] - Opaque units of work
//! - [`worker`] - Threads that run jobs until they sit idle for a full timeout
//!
//! Workers are spawned once, at construction. Each one exits for good the first
//! time it waits `timeout` without receiving a job, so the pool can only shrink.
//! If every worker has exited, queued jobs never run: producers must keep the
//! channel fed faster than the idle timeout.
//!
//! # Example
//!
//! ```
//! use news_pool::pool::WorkerPool;
//! use std::time::Duration;
//!
//! # fn main() -> news_pool::Result<()> {
//! let pool = WorkerPool::new(2, Duration::from_secs(1))?;
//! for i in 0..4 {
//!     pool.submit_fn(format!("job-{i}"), move || {
//!         println!("running {i}");
//!         Ok(())
//!     })?;
//! }
//! pool.wait_completion();
//! assert_eq!(pool.stats().completed, 4);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod completion;
pub mod job;
pub mod worker;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::error::{Error, JobResult, Result};
use crate::types::{Event, PoolStats, WorkerState};

pub use channel::{TaskChannel, TaskReceiver};
pub use completion::CompletionCounter;
pub use job::{Job, JobPanicked, job_error};
pub use worker::Worker;

use worker::{SharedCounters, WorkerContext};

/// A fixed set of worker threads fed by one bounded task channel
pub struct WorkerPool {
    tasks: TaskChannel,
    completion: Arc<CompletionCounter>,
    counters: Arc<SharedCounters>,
    submitted: AtomicU64,
    workers: Vec<Worker>,
    timeout: Duration,
}

impl WorkerPool {
    /// Spawn `thread_count` workers sharing a channel of capacity `thread_count`
    pub fn new(thread_count: usize, timeout: Duration) -> Result<Self> {
        Self::build(thread_count, timeout, None)
    }

    /// Like [`new`](Self::new), with workers broadcasting [`Event`]s on `event_tx`
    pub fn with_events(
        thread_count: usize,
        timeout: Duration,
        event_tx: broadcast::Sender<Event>,
    ) -> Result<Self> {
        Self::build(thread_count, timeout, Some(event_tx))
    }

    fn build(
        thread_count: usize,
        timeout: Duration,
        event_tx: Option<broadcast::Sender<Event>>,
    ) -> Result<Self> {
        let tasks = TaskChannel::bounded(thread_count);
        let completion = Arc::new(CompletionCounter::new());
        let counters = Arc::new(SharedCounters::default());

        // A spawn failure drops the workers already started; they idle-exit on their own.
        let workers = (0..thread_count)
            .map(|id| {
                Worker::spawn(WorkerContext {
                    id,
                    tasks: tasks.receiver(),
                    timeout,
                    completion: completion.clone(),
                    counters: counters.clone(),
                    event_tx: event_tx.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            workers = thread_count,
            timeout_ms = timeout.as_millis() as u64,
            "Worker pool started"
        );

        Ok(Self {
            tasks,
            completion,
            counters,
            submitted: AtomicU64::new(0),
            workers,
            timeout,
        })
    }

    /// Queue a job, blocking while the channel is full
    ///
    /// Fails with [`Error::NoLiveWorkers`] when every worker has already
    /// idle-exited, since the job could never run. Job failures are not
    /// reported here: they are logged by the worker that runs the job.
    pub fn submit(&self, job: Job) -> Result<()> {
        if self.live_workers() == 0 {
            tracing::warn!(
                job = job.label(),
                workers = self.workers.len(),
                "Rejecting job, no live workers"
            );
            return Err(Error::NoLiveWorkers {
                workers: self.workers.len(),
            });
        }

        self.completion.increment();
        if let Err(e) = self.tasks.enqueue(job) {
            self.completion.decrement();
            return Err(e);
        }
        self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Wrap `task` into a [`Job`] labelled `label` and submit it
    pub fn submit_fn<F>(&self, label: impl Into<String>, task: F) -> Result<()>
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        self.submit(Job::new(label, task))
    }

    /// Block until every submitted job has finished
    ///
    /// Failed jobs count as finished. Submitting concurrently with this call
    /// does not give a clean barrier: the wait may return between two submits.
    pub fn wait_completion(&self) {
        self.completion.wait_zero();
    }

    /// Like [`wait_completion`](Self::wait_completion), giving up after `timeout`
    ///
    /// Returns true if every submitted job has finished.
    pub fn wait_completion_timeout(&self, timeout: Duration) -> bool {
        self.completion.wait_zero_timeout(timeout)
    }

    /// Shared handle on the completion counter, for waiting off the pool's thread
    pub(crate) fn completion(&self) -> Arc<CompletionCounter> {
        self.completion.clone()
    }

    /// Number of workers spawned at construction
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of workers that have not idle-exited
    pub fn live_workers(&self) -> usize {
        self.counters.live_workers.load(Ordering::SeqCst)
    }

    /// State of each worker, indexed by worker id
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.workers.iter().map(Worker::state).collect()
    }

    /// Capacity of the task channel
    pub fn capacity(&self) -> usize {
        self.tasks.capacity()
    }

    /// Jobs submitted but not finished
    pub fn pending(&self) -> usize {
        self.completion.pending()
    }

    /// Idle timeout of the workers
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.workers.len(),
            live_workers: self.live_workers(),
            capacity: self.tasks.capacity(),
            queued: self.tasks.len(),
            pending: self.completion.pending(),
            submitted: self.submitted.load(Ordering::SeqCst),
            completed: self.counters.completed.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }

    /// Wait for every worker to idle-exit, returning the jobs each one ran
    ///
    /// Consumes the pool. This takes at least one idle timeout after the last
    /// job finished.
    pub fn shutdown(self) -> Result<Vec<u64>> {
        let WorkerPool { tasks, workers, .. } = self;
        // Keep the channel alive until the workers are gone
        let executed = workers
            .into_iter()
            .map(Worker::join)
            .collect::<Result<Vec<_>>>();
        drop(tasks);
        executed
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .field("timeout", &self.timeout)
            .field("stats", &self.stats())
            .finish()
    }
}
