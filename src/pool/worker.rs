//! Worker threads: pull a job, run it, repeat until idle for too long.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::broadcast;

use super::channel::TaskReceiver;
use super::completion::CompletionCounter;
use crate::error::{Error, Result};
use crate::types::{Event, WorkerState};

/// Counters shared by all workers of one pool
#[derive(Debug, Default)]
pub(crate) struct SharedCounters {
    /// Workers that have not exited yet
    pub(crate) live_workers: AtomicUsize,
    /// Jobs finished (success or failure)
    pub(crate) completed: AtomicU64,
    /// Jobs that returned an error or panicked
    pub(crate) failed: AtomicU64,
}

/// Everything a worker thread needs, moved into it at spawn time
pub(crate) struct WorkerContext {
    pub(crate) id: usize,
    pub(crate) tasks: TaskReceiver,
    pub(crate) timeout: Duration,
    pub(crate) completion: Arc<CompletionCounter>,
    pub(crate) counters: Arc<SharedCounters>,
    pub(crate) event_tx: Option<broadcast::Sender<Event>>,
}

/// Handle to a spawned worker thread
///
/// Dropping the handle detaches the thread; it still exits on its own once
/// it goes a full timeout without a job.
pub struct Worker {
    id: usize,
    state: Arc<AtomicU8>,
    handle: JoinHandle<u64>,
}

impl Worker {
    /// Spawn the worker thread; it starts in [`WorkerState::Running`]
    pub(crate) fn spawn(ctx: WorkerContext) -> Result<Self> {
        let id = ctx.id;
        let state = Arc::new(AtomicU8::new(WorkerState::Running.as_u8()));
        let thread_state = state.clone();

        // Counted before the thread starts so a fast idle-exit cannot underflow.
        ctx.counters.live_workers.fetch_add(1, Ordering::SeqCst);
        let counters = ctx.counters.clone();

        let handle = thread::Builder::new()
            .name(format!("news-pool-worker-{id}"))
            .spawn(move || run(ctx, &thread_state))
            .map_err(|source| {
                counters.live_workers.fetch_sub(1, Ordering::SeqCst);
                Error::WorkerSpawn {
                    worker_id: id,
                    source,
                }
            })?;

        Ok(Self { id, state, handle })
    }

    /// Index of the worker within its pool
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// True once the thread has returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker to idle-exit and return how many jobs it ran
    pub fn join(self) -> Result<u64> {
        self.handle
            .join()
            .map_err(|_| Error::Join(format!("worker {} panicked", self.id)))
    }
}

fn run(ctx: WorkerContext, state: &AtomicU8) -> u64 {
    let mut executed = 0u64;

    while let Some(job) = ctx.tasks.dequeue_or_timeout(ctx.timeout) {
        state.store(WorkerState::Executing.as_u8(), Ordering::SeqCst);
        let label = job.label().to_string();

        if let Err(e) = job.run() {
            ctx.counters.failed.fetch_add(1, Ordering::SeqCst);
            tracing::error!(worker_id = ctx.id, job = %label, error = %e, "Job failed");
            if let Some(tx) = &ctx.event_tx {
                // No subscribers is fine
                tx.send(Event::JobFailed {
                    worker_id: ctx.id,
                    job: label,
                    error: e.to_string(),
                })
                .ok();
            }
        }

        executed += 1;
        ctx.counters.completed.fetch_add(1, Ordering::SeqCst);
        ctx.completion.decrement();
        state.store(WorkerState::Running.as_u8(), Ordering::SeqCst);
    }

    state.store(WorkerState::Stopped.as_u8(), Ordering::SeqCst);
    ctx.counters.live_workers.fetch_sub(1, Ordering::SeqCst);
    tracing::debug!(
        worker_id = ctx.id,
        jobs_executed = executed,
        timeout_ms = ctx.timeout.as_millis() as u64,
        "Worker idle, exiting"
    );
    if let Some(tx) = &ctx.event_tx {
        tx.send(Event::WorkerExited {
            worker_id: ctx.id,
            jobs_executed: executed,
        })
        .ok();
    }

    executed
}
