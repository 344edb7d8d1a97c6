//! Search result cache to avoid hitting the news backend for repeat queries

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::ArticleSource;
use crate::article::CandidateArticle;
use crate::error::Result;

/// Cache key for a search request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Full query string sent to the source
    pub query: String,
    /// Requested result limit
    pub max_results: usize,
}

/// Wraps an [`ArticleSource`] and reuses its results for a fixed lifespan
///
/// Only successful searches are stored, so a transient upstream failure is
/// retried on the next request.
pub struct CachedSource {
    inner: Arc<dyn ArticleSource>,
    cache: Arc<RwLock<TimedCache<SearchKey, Vec<CandidateArticle>>>>,
}

impl CachedSource {
    /// Create a cache in front of `inner` with the given TTL
    pub fn new(inner: Arc<dyn ArticleSource>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Drop every cached search
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached searches (expired entries may still be counted)
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for CachedSource {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cache: Arc::clone(&self.cache),
        }
    }
}

#[async_trait]
impl ArticleSource for CachedSource {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<CandidateArticle>> {
        let key = SearchKey {
            query: query.to_string(),
            max_results,
        };

        // TimedCache needs &mut even for reads (hit/miss counters)
        if let Some(hit) = self.cache.write().await.cache_get(&key).cloned() {
            tracing::debug!("Search cache hit for {:?}", key);
            return Ok(hit);
        }

        tracing::debug!("Search cache miss for {:?}", key);
        let articles = self.inner.search(query, max_results).await?;

        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, articles.clone());

        Ok(articles)
    }
}
