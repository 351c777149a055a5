//! Batch barriers: wait for every job, then reset for the next batch.

use std::mem;

use super::{ActiveBatch, BatchState, NewsPool};
use crate::error::{Error, Result};
use crate::types::Event;

impl NewsPool {
    /// Block until every job of the active batch has finished, then go idle
    ///
    /// Failed jobs count as finished: their errors are logged and broadcast as
    /// [`Event::JobFailed`], never returned here. Afterwards the item list is
    /// empty and the pool is dropped, so a new batch can be set.
    ///
    /// Returns [`Error::NoActiveBatch`] immediately if no batch was set.
    pub fn join(&mut self) -> Result<()> {
        let batch = self.take_batch()?;
        batch.pool.wait_completion();
        self.finish(batch);
        Ok(())
    }

    /// Async flavour of [`join`](Self::join)
    ///
    /// The wait runs on tokio's blocking thread pool so the calling task does
    /// not stall its runtime. The batch stays active until the wait completes:
    /// if the returned future is dropped early, new batches are still rejected
    /// and a later `join` or `join_async` picks up the same batch.
    pub async fn join_async(&mut self) -> Result<()> {
        let completion = self.active_batch()?.pool.completion();
        tokio::task::spawn_blocking(move || completion.wait_zero())
            .await
            .map_err(|e| Error::Join(e.to_string()))?;
        let batch = self.take_batch()?;
        self.finish(batch);
        Ok(())
    }

    fn active_batch(&self) -> Result<&ActiveBatch> {
        match &self.state {
            BatchState::Active(batch) => Ok(batch),
            BatchState::Idle => {
                tracing::error!(
                    "join() called with no active batch, \
                     call set_papers(..) or set_articles(..) first"
                );
                Err(Error::NoActiveBatch)
            }
        }
    }

    fn take_batch(&mut self) -> Result<ActiveBatch> {
        self.active_batch()?;
        match mem::replace(&mut self.state, BatchState::Idle) {
            BatchState::Active(batch) => Ok(batch),
            BatchState::Idle => Err(Error::NoActiveBatch),
        }
    }

    fn finish(&self, batch: ActiveBatch) {
        let kind = batch.items.kind();
        let stats = batch.pool.stats();
        let elapsed_ms = batch.started.elapsed().as_millis() as u64;

        tracing::info!(
            kind = %kind,
            completed = stats.completed,
            failed = stats.failed,
            live_workers = stats.live_workers,
            elapsed_ms,
            "Batch joined"
        );
        self.event_tx
            .send(Event::BatchJoined {
                kind,
                completed: stats.completed,
                failed: stats.failed,
                elapsed_ms,
            })
            .ok();
        // Dropping the batch drops the pool; idle workers exit on their own
    }
}
