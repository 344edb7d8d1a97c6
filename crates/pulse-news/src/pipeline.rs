//! Pipeline orchestrator

use futures::{FutureExt, StreamExt, stream};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::article::CandidateArticle;
use crate::config::DigestConfig;
use crate::digest::{AnalyzedArticle, DigestResult, Mode, Scoring};
use crate::error::{PulseError, Result};
use crate::lexicon::LexiconScorer;
use crate::narrative::{NarrativeAnalyzer, NarrativeOutcome};
use crate::source::ArticleSource;

/// Drives a digest run: search, per-article scoring, aggregation.
///
/// Holds only shared, read-only handles; no state survives between runs.
pub struct NewsPipeline {
    config: Arc<DigestConfig>,
    source: Arc<dyn ArticleSource>,
    scorer: Arc<LexiconScorer>,
    narrative: Option<Arc<NarrativeAnalyzer>>,
}

impl NewsPipeline {
    pub fn new(config: DigestConfig, source: Arc<dyn ArticleSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            scorer: Arc::new(LexiconScorer::new()),
            narrative: None,
        }
    }

    /// Enable deep mode
    pub fn with_narrative(mut self, analyzer: NarrativeAnalyzer) -> Self {
        self.narrative = Some(Arc::new(analyzer));
        self
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Run one digest.
    ///
    /// `limit` falls back to the per-mode default. Only the search can fail
    /// the run; per-article problems end up as degraded entries.
    #[instrument(skip(self))]
    pub async fn run(&self, ticker: &str, limit: Option<usize>, mode: Mode) -> Result<DigestResult> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(PulseError::InvalidRequest(
                "ticker must not be empty".to_string(),
            ));
        }

        let limit = limit.unwrap_or(match mode {
            Mode::Fast => self.config.default_fast_limit,
            Mode::Deep => self.config.default_deep_limit,
        });
        if limit == 0 {
            return Err(PulseError::InvalidRequest(
                "limit must be at least 1".to_string(),
            ));
        }

        let analyzer = match mode {
            Mode::Fast => None,
            Mode::Deep => Some(self.narrative.clone().ok_or_else(|| {
                PulseError::ConfigError("deep mode needs a narrative analyzer".to_string())
            })?),
        };

        let query = self.config.search_query(ticker);
        info!(%query, limit, "Searching news");
        let candidates = self.source.search(&query, limit).await?;
        info!(count = candidates.len(), "Scoring articles");

        let (articles, engine) = match analyzer {
            Some(analyzer) => {
                let engine = analyzer.model().to_string();
                (self.analyze_all(ticker, candidates, analyzer).await, Some(engine))
            }
            None => (self.score_headlines(candidates), None),
        };

        let digest = DigestResult::assemble(ticker, mode, articles, engine);
        info!(
            articles = digest.article_count,
            degraded = digest.degraded_count(),
            overall = digest.overall_label.map(|l| l.as_str()),
            "Digest complete"
        );
        Ok(digest)
    }

    fn score_headlines(&self, candidates: Vec<CandidateArticle>) -> Vec<AnalyzedArticle> {
        candidates
            .into_iter()
            .map(|article| {
                let score = self.scorer.score(&article.title);
                debug!(title = %article.title, compound = score.compound, "Scored headline");
                AnalyzedArticle {
                    article,
                    scoring: Scoring::Sentiment(score),
                }
            })
            .collect()
    }

    async fn analyze_all(
        &self,
        ticker: &str,
        candidates: Vec<CandidateArticle>,
        analyzer: Arc<NarrativeAnalyzer>,
    ) -> Vec<AnalyzedArticle> {
        let tasks = candidates.into_iter().map(|article| {
            let analyzer = Arc::clone(&analyzer);
            async move {
                let outcome = AssertUnwindSafe(analyzer.analyze(ticker, &article.title, &article.url))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        let cause = panic_message(payload.as_ref());
                        warn!(title = %article.title, %cause, "Article analysis panicked");
                        NarrativeOutcome::degraded(format!("Analysis task failed: {cause}"))
                    });

                AnalyzedArticle {
                    article,
                    scoring: Scoring::Narrative(outcome),
                }
            }
        });

        stream::iter(tasks)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}
