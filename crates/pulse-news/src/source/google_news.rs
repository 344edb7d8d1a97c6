//! Google News RSS search client
//!
//! Queries the public Google News RSS search endpoint, scoped to a language,
//! a country edition and a recency window (`when:2d`).

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use super::ArticleSource;
use crate::article::CandidateArticle;
use crate::config::DigestConfig;
use crate::error::{PulseError, Result};

const GOOGLE_NEWS_RSS_SEARCH: &str = "https://news.google.com/rss/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Google News RSS client with a process-wide request budget
pub struct GoogleNewsSource {
    client: Client,
    base_url: Url,
    language: String,
    country: String,
    recency_window: String,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl GoogleNewsSource {
    /// Create a client from the digest configuration
    pub fn new(config: &DigestConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.source_rate_limit).ok_or_else(|| {
            PulseError::ConfigError("source_rate_limit must be greater than 0".to_string())
        })?;

        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url = Url::parse(GOOGLE_NEWS_RSS_SEARCH)
            .map_err(|e| PulseError::ConfigError(format!("invalid search endpoint: {e}")))?;

        Ok(Self {
            client,
            base_url,
            language: config.language.clone(),
            country: config.country.clone(),
            recency_window: config.recency_window.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        })
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Full request URL for a query
    fn search_url(&self, query: &str) -> Url {
        let q = if self.recency_window.is_empty() {
            query.to_string()
        } else {
            format!("{query} when:{}", self.recency_window)
        };
        let ceid = format!("{}:{}", self.country, self.language);

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &q)
            .append_pair("hl", &self.language)
            .append_pair("gl", &self.country)
            .append_pair("ceid", &ceid);
        url
    }
}

#[async_trait]
impl ArticleSource for GoogleNewsSource {
    #[instrument(skip(self), fields(source = "google_news"))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<CandidateArticle>> {
        self.rate_limiter.until_ready().await;

        let url = self.search_url(query);
        debug!("Fetching Google News RSS: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PulseError::SourceError(format!("Google News request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::SourceError(format!(
                "Google News returned {status}: {body}"
            )));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| PulseError::SourceError(format!("Google News read failed: {e}")))?;

        let mut articles = parse_feed(&content)?;
        articles.truncate(max_results);

        info!("Google News returned {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }
}

/// Convert an RSS 2.0 document into candidate articles, in feed order
pub fn parse_feed(content: &[u8]) -> Result<Vec<CandidateArticle>> {
    let channel =
        rss::Channel::read_from(content).map_err(|e| PulseError::FeedParseError(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| {
            let article = CandidateArticle::new(
                item.title().unwrap_or_default().trim(),
                item.link().unwrap_or_default().trim(),
                item.pub_date().unwrap_or_default().trim(),
            );
            match item.source().and_then(|s| s.title()) {
                Some(publisher) => article.with_source(publisher.trim()),
                None => article,
            }
        })
        .collect())
}
