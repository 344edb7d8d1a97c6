//! Candidate articles as returned by an article source

use serde::{Deserialize, Serialize};

/// A search hit: headline, link and publication time as reported upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateArticle {
    /// Headline
    pub title: String,
    /// Article URL
    pub url: String,
    /// Publication time as the source formats it; empty when unknown
    #[serde(default)]
    pub published_at: String,
    /// Publisher name, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CandidateArticle {
    /// Create an article without publisher information
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        published_at: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            published_at: published_at.into(),
            source: None,
        }
    }

    /// Attach the publisher name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
