//! Article sources: where candidate articles come from

pub mod cached;
pub mod google_news;

pub use cached::CachedSource;
pub use google_news::GoogleNewsSource;

use crate::article::CandidateArticle;
use crate::error::Result;
use async_trait::async_trait;

/// Something that turns a search query into candidate articles
///
/// Results are returned in the source's own relevance order and the
/// pipeline preserves that order in its output. A failure here is fatal to
/// the whole digest request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Search for at most `max_results` articles matching `query`
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<CandidateArticle>>;
}
