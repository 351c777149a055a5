//! Work item capabilities consumed by the orchestrator
//!
//! The pool knows nothing about HTTP or HTML. A source or an article is anything
//! that can be asked to do its work from a worker thread and report whether it
//! succeeded. Implementations keep their own state (fetched HTML, parsed text,
//! discovered articles) behind interior mutability, because the pool only ever
//! holds them through an `Arc`.

use crate::error::JobResult;

/// A news source (a whole site) whose articles can be downloaded in one go
///
/// # Example
///
/// ```
/// use news_pool::{JobResult, NewsSource};
/// use std::sync::Mutex;
///
/// struct Site {
///     url: String,
///     pages: Mutex<Vec<String>>,
/// }
///
/// impl NewsSource for Site {
///     fn url(&self) -> &str {
///         &self.url
///     }
///
///     fn download_articles(&self) -> JobResult {
///         let mut pages = self.pages.lock().map_err(|e| e.to_string())?;
///         pages.push(format!("<html>{}</html>", self.url));
///         Ok(())
///     }
/// }
/// ```
pub trait NewsSource: Send + Sync {
    /// URL identifying the source, used in logs and job labels
    fn url(&self) -> &str;

    /// Download every article belonging to this source
    ///
    /// Called exactly once per batch, from a worker thread.
    fn download_articles(&self) -> JobResult;
}

/// A single article that is fetched and then processed
pub trait NewsArticle: Send + Sync {
    /// URL of the article, used in logs and job labels
    fn url(&self) -> &str;

    /// Fetch the article content
    fn download(&self) -> JobResult;

    /// Process the fetched content
    ///
    /// With [`ArticleOrdering::Independent`](crate::config::ArticleOrdering::Independent)
    /// this may run before, during or after `download` on another worker.
    /// Implementations must tolerate being called on an article that has not
    /// been downloaded yet (returning an error is fine).
    fn parse(&self) -> JobResult;
}
