//! Batch setup: pool sizing and job shaping per batch kind.

use std::sync::Arc;

use super::{BatchItems, NewsPool};
use crate::config::ArticleOrdering;
use crate::error::{Error, Result};
use crate::items::{NewsArticle, NewsSource};
use crate::pool::{Job, WorkerPool};

impl NewsPool {
    /// Download every source, one thread per source
    ///
    /// Same as [`set_papers_with_threads`](Self::set_papers_with_threads) with
    /// one thread per source.
    pub fn set_papers(&mut self, papers: Vec<Arc<dyn NewsSource>>) -> Result<()> {
        self.set_papers_with_threads(papers, 1)
    }

    /// Download every source with `threads_per_source` workers per source
    ///
    /// The pool gets `threads_per_source * papers.len()` workers and exactly one
    /// `download_articles` job per source. Giving every source its own thread
    /// means a slow or rate-limited host only holds up its own articles.
    ///
    /// Returns once every job is enqueued; call [`join`](Self::join) to wait
    /// for them.
    pub fn set_papers_with_threads(
        &mut self,
        papers: Vec<Arc<dyn NewsSource>>,
        threads_per_source: usize,
    ) -> Result<()> {
        self.ensure_idle()?;
        if threads_per_source == 0 && !papers.is_empty() {
            return Err(Error::InvalidBatch(
                "threads_per_source must be at least 1".to_string(),
            ));
        }
        let num_threads = threads_per_source.checked_mul(papers.len()).ok_or_else(|| {
            Error::InvalidBatch(format!(
                "{} sources x {threads_per_source} threads overflows",
                papers.len()
            ))
        })?;

        let pool = self.spawn_pool(num_threads)?;
        let jobs = papers
            .iter()
            .map(|paper| {
                let paper = Arc::clone(paper);
                Job::new(format!("download_articles({})", paper.url()), move || {
                    paper.download_articles()
                })
            })
            .collect();
        let submitted = submit_all(&pool, jobs)?;

        self.activate(BatchItems::Sources(papers), pool, submitted);
        Ok(())
    }

    /// Download and parse every article on at most `max_number_threads` workers
    ///
    /// With [`ArticleOrdering::Independent`] (the default) each article gets two
    /// sibling jobs, `download` then `parse`, submitted back to back. Nothing
    /// links them: with two or more workers `parse` may start before
    /// `download` is done. [`ArticleOrdering::Chained`] submits a single job
    /// per article that parses only after a successful download.
    pub fn set_articles(&mut self, articles: Vec<Arc<dyn NewsArticle>>) -> Result<()> {
        self.ensure_idle()?;
        let num_threads = articles.len().min(self.config.max_number_threads);

        let pool = self.spawn_pool(num_threads)?;
        let jobs = article_jobs(&articles, self.config.article_ordering);
        let submitted = submit_all(&pool, jobs)?;

        self.activate(BatchItems::Articles(articles), pool, submitted);
        Ok(())
    }

    fn spawn_pool(&self, num_threads: usize) -> Result<WorkerPool> {
        WorkerPool::with_events(
            num_threads,
            self.config.thread_timeout_seconds,
            self.event_tx.clone(),
        )
    }
}

/// Jobs for an article batch, in per-article order
fn article_jobs(articles: &[Arc<dyn NewsArticle>], ordering: ArticleOrdering) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(match ordering {
        ArticleOrdering::Independent => articles.len() * 2,
        ArticleOrdering::Chained => articles.len(),
    });

    for article in articles {
        match ordering {
            ArticleOrdering::Independent => {
                let downloader = Arc::clone(article);
                jobs.push(Job::new(format!("download({})", article.url()), move || {
                    downloader.download()
                }));
                let parser = Arc::clone(article);
                jobs.push(Job::new(format!("parse({})", article.url()), move || {
                    parser.parse()
                }));
            }
            ArticleOrdering::Chained => {
                let article = Arc::clone(article);
                jobs.push(Job::new(
                    format!("download+parse({})", article.url()),
                    move || {
                        article.download()?;
                        article.parse()
                    },
                ));
            }
        }
    }

    jobs
}

/// Submit every job in order, returning how many were accepted
///
/// On failure the pool is dropped by the caller; its workers are already gone
/// (that is what makes a submit fail), so nothing keeps running.
fn submit_all(pool: &WorkerPool, jobs: Vec<Job>) -> Result<usize> {
    let total = jobs.len();
    for (submitted, job) in jobs.into_iter().enumerate() {
        if let Err(e) = pool.submit(job) {
            tracing::error!(
                submitted,
                total,
                error = %e,
                "Batch aborted while enqueueing jobs"
            );
            return Err(e);
        }
    }
    Ok(total)
}
