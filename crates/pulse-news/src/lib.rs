//! News-to-verdict pipeline
//!
//! Turns a stock ticker (or company name) into a scored news digest. Two
//! modes are supported:
//!
//! - **Fast**: headlines are scored with a VADER lexicon and averaged into
//!   an overall `Bullish (Positive)` / `Bearish (Negative)` / `Neutral` label.
//! - **Deep**: each article body is downloaded and handed to a
//!   text-generation model, whose three-line reply is decoded into a
//!   summary, an impact and a reason.
//!
//! Per-article failures never fail a run; only the news search can.
//!
//! # Example
//!
//! ```rust,ignore
//! use pulse_news::{DigestConfig, GoogleNewsSource, Mode, NewsPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DigestConfig::from_env()?;
//!     let source = Arc::new(GoogleNewsSource::new(&config)?);
//!
//!     let pipeline = NewsPipeline::new(config, source);
//!     let digest = pipeline.run("Tata Motors", None, Mode::Fast).await?;
//!     println!("{}", serde_json::to_string_pretty(&digest.to_payload())?);
//!
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod config;
pub mod digest;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod narrative;
pub mod pipeline;
pub mod source;

#[cfg(test)]
mod test_support;

pub use article::CandidateArticle;
pub use config::{DigestConfig, DigestConfigBuilder};
pub use digest::{
    AnalyzedArticle, DeepArticle, DeepPayload, DigestPayload, DigestResult, FastArticle,
    FastPayload, Mode, OverallSentiment, Scoring,
};
pub use error::{PulseError, Result};
pub use extract::{ContentExtractor, HtmlExtractor};
pub use lexicon::{LexiconScorer, Sentiment, SentimentScore};
pub use narrative::{Impact, NarrativeAnalyzer, NarrativeOutcome, NarrativeVerdict};
pub use pipeline::NewsPipeline;
pub use source::{ArticleSource, CachedSource, GoogleNewsSource};
