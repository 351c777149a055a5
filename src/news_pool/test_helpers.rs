//! Mock sources and articles for orchestrator tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::error::JobResult;
use crate::items::{NewsArticle, NewsSource};
use crate::pool::job_error;

/// Config with a short idle timeout so detached workers do not linger
pub(crate) fn test_config(max_number_threads: usize) -> Config {
    Config {
        thread_timeout_seconds: Duration::from_millis(500),
        max_number_threads,
        ..Config::default()
    }
}

/// Source counting its `download_articles` calls
pub(crate) struct MockSource {
    url: String,
    delay: Duration,
    fail: bool,
    pub(crate) calls: AtomicUsize,
}

impl MockSource {
    pub(crate) fn new(url: &str) -> Arc<Self> {
        Self::build(url, Duration::ZERO, false)
    }

    pub(crate) fn slow(url: &str, delay: Duration) -> Arc<Self> {
        Self::build(url, delay, false)
    }

    pub(crate) fn failing(url: &str) -> Arc<Self> {
        Self::build(url, Duration::ZERO, true)
    }

    fn build(url: &str, delay: Duration, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            delay,
            fail,
            calls: AtomicUsize::new(0),
        })
    }
}

impl NewsSource for MockSource {
    fn url(&self) -> &str {
        &self.url
    }

    fn download_articles(&self) -> JobResult {
        std::thread::sleep(self.delay);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(job_error(format!("{} refused connection", self.url)));
        }
        Ok(())
    }
}

/// Article recording every step, in the order steps ran across all articles
pub(crate) struct MockArticle {
    url: String,
    download_delay: Duration,
    fail_download: bool,
    downloaded: AtomicBool,
    pub(crate) download_calls: AtomicUsize,
    pub(crate) parse_calls: AtomicUsize,
    /// Parses that ran before the download had finished
    pub(crate) early_parses: AtomicUsize,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockArticle {
    pub(crate) fn new(url: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Self::build(url, Duration::ZERO, false, log)
    }

    pub(crate) fn slow(url: &str, delay: Duration, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Self::build(url, delay, false, log)
    }

    pub(crate) fn failing(url: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Self::build(url, Duration::ZERO, true, log)
    }

    fn build(
        url: &str,
        download_delay: Duration,
        fail_download: bool,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            download_delay,
            fail_download,
            downloaded: AtomicBool::new(false),
            download_calls: AtomicUsize::new(0),
            parse_calls: AtomicUsize::new(0),
            early_parses: AtomicUsize::new(0),
            log: log.clone(),
        })
    }
}

impl NewsArticle for MockArticle {
    fn url(&self) -> &str {
        &self.url
    }

    fn download(&self) -> JobResult {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.download_delay);
        if self.fail_download {
            return Err(job_error(format!("{} returned 500", self.url)));
        }
        self.downloaded.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("download {}", self.url));
        Ok(())
    }

    fn parse(&self) -> JobResult {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        if !self.downloaded.load(Ordering::SeqCst) {
            self.early_parses.fetch_add(1, Ordering::SeqCst);
            return Err(job_error(format!("{} parsed before download", self.url)));
        }
        self.log.lock().unwrap().push(format!("parse {}", self.url));
        Ok(())
    }
}

pub(crate) fn as_sources(sources: &[Arc<MockSource>]) -> Vec<Arc<dyn NewsSource>> {
    sources
        .iter()
        .map(|s| s.clone() as Arc<dyn NewsSource>)
        .collect()
}

pub(crate) fn as_articles(articles: &[Arc<MockArticle>]) -> Vec<Arc<dyn NewsArticle>> {
    articles
        .iter()
        .map(|a| a.clone() as Arc<dyn NewsArticle>)
        .collect()
}
