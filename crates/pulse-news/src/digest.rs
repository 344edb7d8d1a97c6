//! Digest result, aggregation and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::article::CandidateArticle;
use crate::lexicon::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, SentimentScore};
use crate::narrative::{Impact, NarrativeOutcome};

/// Scoring strategy for a digest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Headline lexicon scoring
    Fast,
    /// Body extraction plus LLM impact analysis
    Deep,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

/// The one score attached to an analyzed article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scoring {
    Sentiment(SentimentScore),
    Narrative(NarrativeOutcome),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub article: CandidateArticle,
    pub scoring: Scoring,
}

impl AnalyzedArticle {
    pub fn compound(&self) -> Option<f64> {
        match &self.scoring {
            Scoring::Sentiment(score) => Some(score.compound),
            Scoring::Narrative(_) => None,
        }
    }

    pub fn impact(&self) -> Option<Impact> {
        match &self.scoring {
            Scoring::Sentiment(_) => None,
            Scoring::Narrative(outcome) => Some(outcome.verdict().impact),
        }
    }
}

/// Aggregate label over a fast-mode digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallSentiment {
    #[serde(rename = "Bullish (Positive)")]
    Bullish,
    #[serde(rename = "Bearish (Negative)")]
    Bearish,
    Neutral,
}

impl OverallSentiment {
    /// Map a mean compound through the per-article thresholds
    pub fn from_mean(mean: f64) -> Self {
        if mean >= POSITIVE_THRESHOLD {
            Self::Bullish
        } else if mean <= NEGATIVE_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    /// Mean of the compounds, or `Neutral` for an empty set
    pub fn from_compounds(compounds: &[f64]) -> Self {
        Self::from_mean(mean_compound(compounds))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish (Positive)",
            Self::Bearish => "Bearish (Negative)",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for OverallSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn mean_compound(compounds: &[f64]) -> f64 {
    if compounds.is_empty() {
        return 0.0;
    }
    compounds.iter().sum::<f64>() / compounds.len() as f64
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestResult {
    pub ticker: String,
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    /// Set for fast runs only
    pub overall_label: Option<OverallSentiment>,
    pub article_count: usize,
    pub articles: Vec<AnalyzedArticle>,
    /// Model identifier for deep runs
    pub analysis_engine: Option<String>,
}

impl DigestResult {
    pub(crate) fn assemble(
        ticker: &str,
        mode: Mode,
        articles: Vec<AnalyzedArticle>,
        analysis_engine: Option<String>,
    ) -> Self {
        let overall_label = match mode {
            Mode::Fast => {
                let compounds: Vec<f64> = articles
                    .iter()
                    .filter_map(AnalyzedArticle::compound)
                    .collect();
                Some(OverallSentiment::from_compounds(&compounds))
            }
            Mode::Deep => None,
        };

        Self {
            ticker: ticker.to_string(),
            generated_at: Utc::now(),
            mode,
            overall_label,
            article_count: articles.len(),
            articles,
            analysis_engine,
        }
    }

    /// Most frequent impact across deep-mode articles.
    ///
    /// Ties and an empty digest give `Neutral`. Not part of `overall_label`.
    pub fn impact_majority(&self) -> Impact {
        let (mut bullish, mut bearish, mut neutral) = (0usize, 0usize, 0usize);
        for impact in self.articles.iter().filter_map(AnalyzedArticle::impact) {
            match impact {
                Impact::Bullish => bullish += 1,
                Impact::Bearish => bearish += 1,
                Impact::Neutral => neutral += 1,
            }
        }

        if bullish > bearish && bullish > neutral {
            Impact::Bullish
        } else if bearish > bullish && bearish > neutral {
            Impact::Bearish
        } else {
            Impact::Neutral
        }
    }

    pub fn degraded_count(&self) -> usize {
        self.articles
            .iter()
            .filter(|a| matches!(&a.scoring, Scoring::Narrative(o) if o.is_degraded()))
            .count()
    }

    /// Response shape for the mode this digest was produced in
    pub fn to_payload(&self) -> DigestPayload {
        match self.mode {
            Mode::Fast => DigestPayload::Fast(self.to_fast_payload()),
            Mode::Deep => DigestPayload::Deep(self.to_deep_payload()),
        }
    }

    pub fn to_fast_payload(&self) -> FastPayload {
        let articles = self
            .articles
            .iter()
            .filter_map(|a| match &a.scoring {
                Scoring::Sentiment(score) => Some(FastArticle {
                    title: a.article.title.clone(),
                    link: a.article.url.clone(),
                    published_at: a.article.published_at.clone(),
                    sentiment: score.label.as_str().to_string(),
                    sentiment_score: score.compound,
                }),
                Scoring::Narrative(_) => None,
            })
            .collect();

        FastPayload {
            stock: self.ticker.clone(),
            generated_at: self.generated_at,
            overall_sentiment: self
                .overall_label
                .unwrap_or(OverallSentiment::Neutral)
                .as_str()
                .to_string(),
            news_count: self.article_count,
            articles,
        }
    }

    pub fn to_deep_payload(&self) -> DeepPayload {
        let articles = self
            .articles
            .iter()
            .filter_map(|a| match &a.scoring {
                Scoring::Narrative(outcome) => {
                    let verdict = outcome.verdict();
                    Some(DeepArticle {
                        title: a.article.title.clone(),
                        link: a.article.url.clone(),
                        published: a.article.published_at.clone(),
                        ai_summary: verdict.summary.clone(),
                        market_impact: verdict.impact.as_str().to_string(),
                        impact_reason: verdict.reason.clone(),
                        degraded: outcome.is_degraded(),
                    })
                }
                Scoring::Sentiment(_) => None,
            })
            .collect();

        DeepPayload {
            stock: self.ticker.clone(),
            analysis_engine: self.analysis_engine.clone().unwrap_or_default(),
            articles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastArticle {
    pub title: String,
    pub link: String,
    pub published_at: String,
    pub sentiment: String,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastPayload {
    pub stock: String,
    pub generated_at: DateTime<Utc>,
    pub overall_sentiment: String,
    pub news_count: usize,
    pub articles: Vec<FastArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepArticle {
    pub title: String,
    pub link: String,
    pub published: String,
    pub ai_summary: String,
    pub market_impact: String,
    pub impact_reason: String,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepPayload {
    pub stock: String,
    pub analysis_engine: String,
    pub articles: Vec<DeepArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DigestPayload {
    Fast(FastPayload),
    Deep(DeepPayload),
}
