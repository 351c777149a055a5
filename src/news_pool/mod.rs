//! Batch orchestrator split into focused submodules.
//!
//! - [`batch`] - Pool sizing and job shaping for source and article batches
//! - [`join`] - Blocking and async barriers that end a batch
//!
//! A [`NewsPool`] is an explicit two-state machine: `Idle` until one of the
//! `set_*` methods starts a batch, `BatchActive` until `join()` returns.
//! Starting a batch while another is active is rejected instead of silently
//! replacing (and leaking) the running pool.

mod batch;
mod join;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::items::{NewsArticle, NewsSource};
use crate::pool::WorkerPool;
use crate::types::{BatchKind, Event, PoolStats};

/// Items of the active batch, kept alive until `join()` returns
pub(crate) enum BatchItems {
    Sources(Vec<Arc<dyn NewsSource>>),
    Articles(Vec<Arc<dyn NewsArticle>>),
}

impl BatchItems {
    fn kind(&self) -> BatchKind {
        match self {
            BatchItems::Sources(_) => BatchKind::Sources,
            BatchItems::Articles(_) => BatchKind::Articles,
        }
    }
}

/// A batch whose jobs have been enqueued and not joined yet
pub(crate) struct ActiveBatch {
    pub(crate) items: BatchItems,
    pub(crate) pool: WorkerPool,
    pub(crate) started: Instant,
}

/// Lifecycle of the orchestrator
pub(crate) enum BatchState {
    Idle,
    Active(ActiveBatch),
}

/// Runs batches of sources or articles on a fresh worker pool per batch
///
/// # Example
///
/// ```no_run
/// use news_pool::{Config, JobResult, NewsPool, NewsSource};
/// use std::sync::Arc;
///
/// struct Site(String);
///
/// impl NewsSource for Site {
///     fn url(&self) -> &str {
///         &self.0
///     }
///
///     fn download_articles(&self) -> JobResult {
///         // fetch every article of the site here
///         Ok(())
///     }
/// }
///
/// # fn main() -> news_pool::Result<()> {
/// let mut news_pool = NewsPool::new(Config::default())?;
///
/// let papers: Vec<Arc<dyn NewsSource>> = vec![
///     Arc::new(Site("http://cnn.com".into())),
///     Arc::new(Site("http://techcrunch.com".into())),
///     Arc::new(Site("http://espn.com".into())),
/// ];
/// news_pool.set_papers(papers)?;
/// news_pool.join()?;
/// # Ok(())
/// # }
/// ```
pub struct NewsPool {
    config: Arc<Config>,
    event_tx: broadcast::Sender<Event>,
    state: BatchState,
}

impl NewsPool {
    /// Create an idle orchestrator
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let (event_tx, _rx) = broadcast::channel(config.event_buffer);
        Ok(Self {
            config: Arc::new(config),
            event_tx,
            state: BatchState::Idle,
        })
    }

    /// Subscribe to batch events
    ///
    /// Each subscriber receives every event sent after it subscribed. A
    /// subscriber that falls more than `event_buffer` events behind gets
    /// `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// True between a `set_*` call and the matching `join()`
    pub fn is_active(&self) -> bool {
        matches!(self.state, BatchState::Active(_))
    }

    /// Kind of the active batch, if any
    pub fn active_kind(&self) -> Option<BatchKind> {
        match &self.state {
            BatchState::Active(batch) => Some(batch.items.kind()),
            BatchState::Idle => None,
        }
    }

    /// Sources of the active batch (empty when idle or running articles)
    pub fn papers(&self) -> &[Arc<dyn NewsSource>] {
        match &self.state {
            BatchState::Active(ActiveBatch {
                items: BatchItems::Sources(papers),
                ..
            }) => papers,
            _ => &[],
        }
    }

    /// Articles of the active batch (empty when idle or running sources)
    pub fn articles(&self) -> &[Arc<dyn NewsArticle>] {
        match &self.state {
            BatchState::Active(ActiveBatch {
                items: BatchItems::Articles(articles),
                ..
            }) => articles,
            _ => &[],
        }
    }

    /// Counters of the active batch's pool
    pub fn stats(&self) -> Option<PoolStats> {
        match &self.state {
            BatchState::Active(batch) => Some(batch.pool.stats()),
            BatchState::Idle => None,
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match &self.state {
            BatchState::Idle => Ok(()),
            BatchState::Active(batch) => Err(Error::BatchActive {
                kind: batch.items.kind().to_string(),
            }),
        }
    }

    fn activate(&mut self, items: BatchItems, pool: WorkerPool, jobs: usize) {
        let kind = items.kind();
        let item_count = match &items {
            BatchItems::Sources(papers) => papers.len(),
            BatchItems::Articles(articles) => articles.len(),
        };
        let started_at: DateTime<Utc> = Utc::now();

        tracing::info!(
            kind = %kind,
            items = item_count,
            workers = pool.worker_count(),
            jobs,
            "Batch started"
        );
        self.event_tx
            .send(Event::BatchStarted {
                kind,
                items: item_count,
                workers: pool.worker_count(),
                jobs,
                started_at,
            })
            .ok();

        self.state = BatchState::Active(ActiveBatch {
            items,
            pool,
            started: Instant::now(),
        });
    }
}

impl Drop for NewsPool {
    fn drop(&mut self) {
        if let BatchState::Active(batch) = &self.state {
            // Workers keep draining the channel and exit once it disconnects
            tracing::warn!(
                kind = %batch.items.kind(),
                pending = batch.pool.pending(),
                "NewsPool dropped with an unjoined batch"
            );
        }
    }
}

impl std::fmt::Debug for NewsPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsPool")
            .field("config", &self.config)
            .field("active", &self.active_kind())
            .finish()
    }
}
