//! Headline sentiment scoring with the VADER lexicon
//!
//! VADER (Valence Aware Dictionary and sEntiment Reasoner) produces a
//! compound polarity in `[-1.0, 1.0]`, which is bucketed into three labels
//! with fixed thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound scores at or above this are positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Bucket a compound score
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment of one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    /// VADER compound polarity, always within `[-1.0, 1.0]`
    pub compound: f64,
}

impl SentimentScore {
    /// Build a score from a raw compound value, clamping it into range
    pub fn from_compound(compound: f64) -> Self {
        let compound = if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: Sentiment::from_compound(compound),
            compound,
        }
    }
}

/// Stateless lexicon scorer, safe to share across tasks
pub struct LexiconScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score a short text such as a headline. Never fails; empty text is neutral.
    pub fn score(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return SentimentScore::from_compound(0.0);
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        SentimentScore::from_compound(compound)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(Sentiment::from_compound(0.05), Sentiment::Positive);
        assert_eq!(Sentiment::from_compound(-0.05), Sentiment::Negative);
        assert_eq!(Sentiment::from_compound(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(0.049), Sentiment::Neutral);
        assert_eq!(Sentiment::from_compound(-0.049), Sentiment::Neutral);
    }

    #[test]
    fn test_headlines() {
        let scorer = LexiconScorer::new();

        let good = scorer.score("Reliance posts great quarter, investors are happy");
        assert_eq!(good.label, Sentiment::Positive);
        assert!(good.compound > 0.0);

        let bad = scorer.score("HDFC Bank hit by terrible fraud scandal, shares crash");
        assert_eq!(bad.label, Sentiment::Negative);
        assert!(bad.compound < 0.0);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("");
        assert_eq!(score.label, Sentiment::Neutral);
        assert!(score.compound.abs() < f64::EPSILON);

        assert_eq!(scorer.score("   ").label, Sentiment::Neutral);
    }

    #[test]
    fn test_compound_always_in_range_and_label_consistent() {
        let scorer = LexiconScorer::new();
        let texts = [
            "GREAT!!! AMAZING!!! BEST EVER!!! LOVE IT!!!",
            "horrible awful terrible disaster catastrophe fraud",
            "Board meeting scheduled for Thursday",
            "not bad at all",
            "🚀🚀🚀",
        ];

        for text in texts {
            let score = scorer.score(text);
            assert!((-1.0..=1.0).contains(&score.compound), "{text}: {}", score.compound);
            assert_eq!(score.label, Sentiment::from_compound(score.compound));
        }
    }

    #[test]
    fn test_idempotent() {
        let scorer = LexiconScorer::new();
        let text = "Infosys shares surge on strong guidance";
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert!((SentimentScore::from_compound(1.7).compound - 1.0).abs() < f64::EPSILON);
        assert_eq!(SentimentScore::from_compound(f64::NAN).label, Sentiment::Neutral);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Sentiment::Negative.to_string(), "Negative");
    }
}
