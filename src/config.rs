//! Configuration types for news-pool

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the two jobs of an article (download, then parse) are queued
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleOrdering {
    /// `download` and `parse` are two sibling jobs (default)
    ///
    /// Nothing orders them beyond FIFO submission: with two or more workers,
    /// `parse` may start before `download` has finished.
    #[default]
    Independent,
    /// One job per article that runs `download` and then, if it succeeded, `parse`
    Chained,
}

/// Main configuration for [`NewsPool`](crate::NewsPool)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Idle timeout of a worker, also the bound of each dequeue wait (default: 1 second)
    ///
    /// Serialized as integer seconds.
    #[serde(default = "default_thread_timeout", with = "duration_serde")]
    pub thread_timeout_seconds: Duration,

    /// Ceiling on the number of workers for article batches (default: 10)
    #[serde(default = "default_max_number_threads")]
    pub max_number_threads: usize,

    /// Shape of the per-article jobs (default: independent siblings)
    #[serde(default)]
    pub article_ordering: ArticleOrdering,

    /// Capacity of the event broadcast channel (default: 1000)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_timeout_seconds: default_thread_timeout(),
            max_number_threads: default_max_number_threads(),
            article_ordering: ArticleOrdering::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON and validate it
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            thread_timeout_secs = config.thread_timeout_seconds.as_secs(),
            max_number_threads = config.max_number_threads,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check that the configuration can drive a batch
    pub fn validate(&self) -> Result<()> {
        if self.thread_timeout_seconds.is_zero() {
            return Err(Error::config(
                "thread_timeout_seconds",
                "thread_timeout_seconds must be greater than zero",
            ));
        }
        if self.max_number_threads == 0 {
            return Err(Error::config(
                "max_number_threads",
                "max_number_threads must be at least 1",
            ));
        }
        if self.event_buffer == 0 {
            return Err(Error::config("event_buffer", "event_buffer must be at least 1"));
        }
        Ok(())
    }
}

fn default_thread_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_max_number_threads() -> usize {
    10
}

fn default_event_buffer() -> usize {
    1000
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
