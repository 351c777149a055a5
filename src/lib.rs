//! # news-pool
//!
//! Bounded, self-shrinking thread pool for downloading news in batches.
//!
//! ## Design Philosophy
//!
//! news-pool is designed to be:
//! - **Polite** - One thread per source, so a slow host only slows itself down
//! - **Bounded** - Article batches never use more than `max_number_threads` threads
//! - **Fresh per batch** - Every batch gets a new pool; workers exit on their own
//!   after sitting idle for `thread_timeout_seconds`
//! - **Failure tolerant** - A failing job is logged and counted as done, it never
//!   stalls the batch
//!
//! Fetching and parsing are left to the caller: anything implementing
//! [`NewsSource`] or [`NewsArticle`] can be scheduled.
//!
//! ## Quick Start
//!
//! ```no_run
//! use news_pool::{Config, JobResult, NewsArticle, NewsPool};
//! use std::sync::Arc;
//!
//! struct Story(String);
//!
//! impl NewsArticle for Story {
//!     fn url(&self) -> &str {
//!         &self.0
//!     }
//!
//!     fn download(&self) -> JobResult {
//!         Ok(())
//!     }
//!
//!     fn parse(&self) -> JobResult {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut news_pool = NewsPool::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = news_pool.subscribe();
//!
//!     let articles: Vec<Arc<dyn NewsArticle>> = (0..25)
//!         .map(|i| Arc::new(Story(format!("https://example.com/{i}"))) as Arc<dyn NewsArticle>)
//!         .collect();
//!     news_pool.set_articles(articles)?;
//!     news_pool.join()?;
//!
//!     while let Ok(event) = events.try_recv() {
//!         println!("Event: {:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Source and article capabilities
pub mod items;
/// Batch orchestrator
pub mod news_pool;
/// Worker pool, task channel and jobs
pub mod pool;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{ArticleOrdering, Config};
pub use error::{Error, JobError, JobResult, Result};
pub use items::{NewsArticle, NewsSource};
pub use news_pool::NewsPool;
pub use pool::{Job, WorkerPool};
pub use types::{BatchKind, Event, PoolStats, WorkerState};
