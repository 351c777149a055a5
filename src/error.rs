//! Error types for news-pool
//!
//! Two families of failure exist in this crate:
//! - [`Error`] covers batch-level problems (misuse of the orchestrator, invalid
//!   configuration, worker spawn failures). These are returned to the caller.
//! - [`JobError`] is whatever a single job reports. Job errors are never returned
//!   from a barrier; the worker logs them and carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for news-pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error produced by a single job (download, parse, ...)
pub type JobError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of running a single job
pub type JobResult = std::result::Result<(), JobError>;

/// Main error type for news-pool
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_number_threads")
        key: Option<String>,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration file {path}: {source}")]
    ConfigFile {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `join()` was called without a preceding `set_papers`/`set_articles`
    #[error("no active batch: call set_papers(..) or set_articles(..) before join()")]
    NoActiveBatch,

    /// A new batch was requested while the previous one has not been joined
    #[error("a {kind} batch is already active: join() it before starting another")]
    BatchActive {
        /// Kind of the batch that is still active ("sources" or "articles")
        kind: String,
    },

    /// The requested batch shape can never complete
    #[error("invalid batch: {0}")]
    InvalidBatch(String),

    /// Every worker of the pool has already idle-exited, so a submitted job would never run
    #[error("worker pool has no live workers left ({workers} spawned, all idle-exited)")]
    NoLiveWorkers {
        /// Number of workers the pool was built with
        workers: usize,
    },

    /// The task channel was disconnected
    #[error("task channel closed")]
    ChannelClosed,

    /// The operating system refused to spawn a worker thread
    #[error("failed to spawn worker thread {worker_id}: {source}")]
    WorkerSpawn {
        /// Index of the worker that could not be spawned
        worker_id: usize,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The blocking join task could not be completed
    #[error("join task failed: {0}")]
    Join(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a configuration key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Returns true if the error comes from calling the orchestrator out of order
    ///
    /// Misuse errors are programming mistakes on the caller side: retrying the same
    /// call without changing the orchestrator state yields the same error.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::NoActiveBatch | Error::BatchActive { .. } | Error::InvalidBatch(_)
        )
    }
}
