//! Fake news sites and articles backed by an in-memory "web"

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use news_pool::{JobResult, NewsArticle, NewsSource};

/// In-memory stand-in for the network: URL -> HTML, plus a fixed latency
pub struct FakeWeb {
    pages: HashMap<String, String>,
    latency: Duration,
    requests: AtomicUsize,
}

impl FakeWeb {
    /// A web where every page takes `latency` to fetch
    pub fn new(latency: Duration) -> Self {
        Self {
            pages: HashMap::new(),
            latency,
            requests: AtomicUsize::new(0),
        }
    }

    /// Publish `count` articles under `site`, returning their URLs
    pub fn publish(&mut self, site: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let url = format!("{site}/story/{i}");
                self.pages.insert(
                    url.clone(),
                    format!("<html><title>Story {i}</title><body>news from {site}</body></html>"),
                );
                url
            })
            .collect()
    }

    /// Fetch a page, sleeping for the configured latency
    pub fn get(&self, url: &str) -> Result<String, String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.latency);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| format!("404 for {url}"))
    }

    /// Number of fetches performed so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// A site that knows its article URLs and fetches them all at once
pub struct FakeSite {
    url: String,
    web: Arc<FakeWeb>,
    article_urls: Vec<String>,
    /// HTML downloaded by `download_articles`, keyed by URL
    pub html: Mutex<HashMap<String, String>>,
    /// Name of the worker thread that downloaded this site
    pub worker: Mutex<Option<String>>,
}

impl FakeSite {
    /// Create a site serving `article_urls` from `web`
    pub fn new(url: &str, web: &Arc<FakeWeb>, article_urls: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            web: web.clone(),
            article_urls,
            html: Mutex::new(HashMap::new()),
            worker: Mutex::new(None),
        })
    }

    /// Turn every article URL of the site into a [`FakeArticle`]
    pub fn articles(&self) -> Vec<Arc<FakeArticle>> {
        self.article_urls
            .iter()
            .map(|url| FakeArticle::new(url, &self.web))
            .collect()
    }
}

impl NewsSource for FakeSite {
    fn url(&self) -> &str {
        &self.url
    }

    fn download_articles(&self) -> JobResult {
        *self.worker.lock().map_err(|e| e.to_string())? =
            std::thread::current().name().map(str::to_string);
        for url in &self.article_urls {
            let page = self.web.get(url)?;
            self.html
                .lock()
                .map_err(|e| e.to_string())?
                .insert(url.clone(), page);
        }
        Ok(())
    }
}

/// A single article: `download` fetches HTML, `parse` extracts the title
pub struct FakeArticle {
    url: String,
    web: Arc<FakeWeb>,
    /// Raw HTML, set by `download`
    pub html: Mutex<Option<String>>,
    /// Title, set by `parse`
    pub title: Mutex<Option<String>>,
}

impl FakeArticle {
    /// Create an article fetched from `web`
    pub fn new(url: &str, web: &Arc<FakeWeb>) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            web: web.clone(),
            html: Mutex::new(None),
            title: Mutex::new(None),
        })
    }
}

impl NewsArticle for FakeArticle {
    fn url(&self) -> &str {
        &self.url
    }

    fn download(&self) -> JobResult {
        let page = self.web.get(&self.url)?;
        *self.html.lock().map_err(|e| e.to_string())? = Some(page);
        Ok(())
    }

    fn parse(&self) -> JobResult {
        let html = self
            .html
            .lock()
            .map_err(|e| e.to_string())?
            .clone()
            .ok_or_else(|| format!("{} has not been downloaded", self.url))?;
        let title = html
            .split("<title>")
            .nth(1)
            .and_then(|rest| rest.split("</title>").next())
            .ok_or_else(|| format!("{} has no title", self.url))?;
        *self.title.lock().map_err(|e| e.to_string())? = Some(title.to_string());
        Ok(())
    }
}
