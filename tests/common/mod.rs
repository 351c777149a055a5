//! Common test utilities for news-pool integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use std::sync::Arc;

use news_pool::{NewsArticle, NewsSource};

/// Erase concrete site types for `set_papers`
#[allow(dead_code)]
pub fn sources<S: NewsSource + 'static>(sites: &[Arc<S>]) -> Vec<Arc<dyn NewsSource>> {
    sites
        .iter()
        .map(|s| s.clone() as Arc<dyn NewsSource>)
        .collect()
}

/// Erase concrete article types for `set_articles`
#[allow(dead_code)]
pub fn articles<A: NewsArticle + 'static>(items: &[Arc<A>]) -> Vec<Arc<dyn NewsArticle>> {
    items
        .iter()
        .map(|a| a.clone() as Arc<dyn NewsArticle>)
        .collect()
}
