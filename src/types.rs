//! Core types and events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of batch running on a [`NewsPool`](crate::NewsPool)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    /// One `download_articles` job per source
    Sources,
    /// `download` + `parse` jobs per article
    Articles,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchKind::Sources => f.write_str("sources"),
            BatchKind::Articles => f.write_str("articles"),
        }
    }
}

/// Lifecycle state of a worker thread
///
/// `Running` and `Executing` alternate for as long as jobs keep arriving.
/// `Stopped` is terminal: a worker that timed out waiting never comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Waiting for the next job
    Running,
    /// Running a job
    Executing,
    /// Idle-exited
    Stopped,
}

impl WorkerState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            WorkerState::Running => 0,
            WorkerState::Executing => 1,
            WorkerState::Stopped => 2,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WorkerState::Running,
            1 => WorkerState::Executing,
            _ => WorkerState::Stopped,
        }
    }
}

/// Snapshot of a worker pool
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Number of workers spawned at construction
    pub workers: usize,

    /// Number of workers that have not idle-exited yet
    pub live_workers: usize,

    /// Capacity of the task channel
    pub capacity: usize,

    /// Jobs sitting in the channel, not yet picked up by a worker
    pub queued: usize,

    /// Jobs submitted but not finished (queued + executing)
    pub pending: usize,

    /// Total jobs accepted by `submit`
    pub submitted: u64,

    /// Total jobs finished, successfully or not
    pub completed: u64,

    /// Jobs among `completed` that returned an error or panicked
    pub failed: u64,
}

/// Event emitted during a batch lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch was set and its jobs enqueued
    BatchStarted {
        /// Kind of batch
        kind: BatchKind,
        /// Number of items in the batch
        items: usize,
        /// Number of workers spawned for it
        workers: usize,
        /// Number of jobs enqueued
        jobs: usize,
        /// When the batch started
        started_at: DateTime<Utc>,
    },

    /// A job returned an error or panicked (the batch keeps going)
    JobFailed {
        /// Worker that ran the job
        worker_id: usize,
        /// Job label, e.g. `download(https://example.com/a)`
        job: String,
        /// Error message
        error: String,
    },

    /// A worker saw no job within its idle timeout and exited
    WorkerExited {
        /// Worker index within its pool
        worker_id: usize,
        /// Number of jobs the worker ran before exiting
        jobs_executed: u64,
    },

    /// `join()` returned for a batch
    BatchJoined {
        /// Kind of batch
        kind: BatchKind,
        /// Jobs finished during the batch
        completed: u64,
        /// Jobs among `completed` that failed
        failed: u64,
        /// Wall-clock time between start and join, in milliseconds
        elapsed_ms: u64,
    },
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_state_survives_atomic_encoding() {
        for state in [
            WorkerState::Running,
            WorkerState::Executing,
            WorkerState::Stopped,
        ] {
            assert_eq!(WorkerState::from_u8(state.as_u8()), state);
        }
    }

    #[test]
    fn event_is_tagged_by_type() {
        let event = Event::JobFailed {
            worker_id: 2,
            job: "parse(https://example.com/a)".into(),
            error: "no body".into(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "job_failed");
        assert_eq!(json["worker_id"], 2);
        assert_eq!(json["error"], "no body");
    }

    #[test]
    fn batch_kind_display_matches_serde_name() {
        assert_eq!(BatchKind::Sources.to_string(), "sources");
        assert_eq!(
            serde_json::to_value(BatchKind::Articles).unwrap(),
            serde_json::json!("articles")
        );
    }
}
