//! Jobs: opaque units of work executed by a worker.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{JobError, JobResult};

type Task = Box<dyn FnOnce() -> JobResult + Send + 'static>;

/// A nullary invocation bound at enqueue time, plus a label for diagnostics
pub struct Job {
    label: String,
    task: Task,
}

impl Job {
    /// Wrap a closure into a job
    ///
    /// The closure captures whatever arguments it needs; the worker calls it
    /// with nothing.
    pub fn new<F>(label: impl Into<String>, task: F) -> Self
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        Self {
            label: label.into(),
            task: Box::new(task),
        }
    }

    /// Label used in logs and events
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the job, turning a panic into an error
    ///
    /// Consumes the job: a job runs at most once.
    pub fn run(self) -> JobResult {
        let Job { label, task } = self;
        match catch_unwind(AssertUnwindSafe(task)) {
            Ok(result) => result,
            Err(payload) => Err(JobPanicked {
                label,
                message: panic_message(payload.as_ref()),
            }
            .into()),
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("label", &self.label).finish()
    }
}

/// A job panicked instead of returning
#[derive(Debug, thiserror::Error)]
#[error("job {label} panicked: {message}")]
pub struct JobPanicked {
    /// Label of the job that panicked
    pub label: String,
    /// Panic payload, when it was a string
    pub message: String,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Convenience for jobs that fail with a plain message
pub fn job_error(message: impl Into<String>) -> JobError {
    let message: String = message.into();
    message.into()
}
