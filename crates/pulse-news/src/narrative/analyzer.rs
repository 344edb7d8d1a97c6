//! Narrative analyzer

use pulse_llm::{CompletionRequest, LLMProvider, Message};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::prompt::ImpactPrompt;
use super::reply::{Impact, ParsedReply, parse_reply};
use crate::config::DigestConfig;
use crate::error::Result;
use crate::extract::ContentExtractor;

pub const DEGRADED_SUMMARY: &str = "Error analyzing.";

/// Summary, impact and reason for one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeVerdict {
    pub summary: String,
    pub impact: Impact,
    pub reason: String,
}

/// Which reply fields the model actually supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPresence {
    pub summary: bool,
    pub impact: bool,
    pub reason: bool,
}

impl FieldPresence {
    pub fn all_present(self) -> bool {
        self.summary && self.impact && self.reason
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeOutcome {
    /// The model replied; missing fields were defaulted
    Analyzed {
        verdict: NarrativeVerdict,
        fields: FieldPresence,
    },
    /// Generation failed or returned nothing usable
    Degraded {
        verdict: NarrativeVerdict,
        reason: String,
    },
}

impl NarrativeOutcome {
    pub fn degraded(cause: impl Into<String>) -> Self {
        let cause = cause.into();
        Self::Degraded {
            verdict: NarrativeVerdict {
                summary: DEGRADED_SUMMARY.to_string(),
                impact: Impact::Neutral,
                reason: cause.clone(),
            },
            reason: cause,
        }
    }

    fn analyzed(reply: ParsedReply) -> Self {
        let fields = FieldPresence {
            summary: !reply.summary.is_defaulted(),
            impact: !reply.impact.is_defaulted(),
            reason: !reply.reason.is_defaulted(),
        };
        Self::Analyzed {
            verdict: NarrativeVerdict {
                summary: reply.summary.into_value(),
                impact: reply.impact.into_value(),
                reason: reply.reason.into_value(),
            },
            fields,
        }
    }

    pub fn verdict(&self) -> &NarrativeVerdict {
        match self {
            Self::Analyzed { verdict, .. } | Self::Degraded { verdict, .. } => verdict,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Turns an article into a [`NarrativeVerdict`] using a text-generation model
pub struct NarrativeAnalyzer {
    extractor: Arc<dyn ContentExtractor>,
    provider: Arc<dyn LLMProvider>,
    prompt: ImpactPrompt,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

impl NarrativeAnalyzer {
    pub fn new(
        config: &DigestConfig,
        extractor: Arc<dyn ContentExtractor>,
        provider: Arc<dyn LLMProvider>,
    ) -> Result<Self> {
        Ok(Self {
            extractor,
            provider,
            prompt: ImpactPrompt::new(config.content_cap, config.min_content_len)?,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, url), fields(provider = self.provider.name()))]
    pub async fn analyze(&self, ticker: &str, title: &str, url: &str) -> NarrativeOutcome {
        let extracted = match self.extractor.fetch(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(url, error = %e, "Extraction failed, using headline only");
                None
            }
        };

        let body = self.prompt.prepare_body(extracted.as_deref());
        let rendered = self.prompt.render_system(ticker).and_then(|system| {
            let prompt = self.prompt.render(ticker, title, &body)?;
            Ok((system, prompt))
        });
        let (system, prompt) = match rendered {
            Ok(parts) => parts,
            Err(e) => return NarrativeOutcome::degraded(e.to_string()),
        };

        let request = CompletionRequest::builder(&self.model)
            .system(system)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Generation failed");
                return NarrativeOutcome::degraded(e.to_string());
            }
        };

        if response.is_truncated() {
            debug!("Reply hit the token budget");
        }

        let text = response.text().trim();
        if text.is_empty() {
            warn!("Model returned an empty reply");
            return NarrativeOutcome::degraded("Model returned an empty reply");
        }

        let reply = parse_reply(text);
        debug!(defaulted = reply.defaulted_count(), "Parsed model reply");
        NarrativeOutcome::analyzed(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PulseError;
    use crate::extract::MockContentExtractor;
    use crate::narrative::HEADLINE_ONLY_NOTE;
    use crate::test_support::{MockProvider, reply};
    use pulse_llm::LLMError;

    fn analyzer(extractor: MockContentExtractor, provider: MockProvider) -> NarrativeAnalyzer {
        NarrativeAnalyzer::new(
            &DigestConfig::default(),
            Arc::new(extractor),
            Arc::new(provider),
        )
        .unwrap()
    }

    fn provider_named() -> MockProvider {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
    }

    #[tokio::test]
    async fn test_analyzed_reply() {
        let mut extractor = MockContentExtractor::new();
        extractor
            .expect_fetch()
            .returning(|_| Ok("Sales declined sharply across every segment this quarter.".into()));

        let mut provider = provider_named();
        provider
            .expect_complete()
            .withf(|req| {
                req.model == "gpt-4o-mini"
                    && req
                        .system
                        .as_deref()
                        .is_some_and(|s| s.contains("financial analyst covering TITAN"))
                    && req.messages.len() == 1
                    && req.messages[0].text().contains("Sales declined sharply")
            })
            .times(1)
            .returning(|_| Ok(reply("IMPACT: Bearish\nSUMMARY: Sales fell\nREASON: weak demand")));

        let outcome = analyzer(extractor, provider)
            .analyze("TITAN", "Titan sales fall", "https://example.com/a")
            .await;

        assert_eq!(
            outcome,
            NarrativeOutcome::Analyzed {
                verdict: NarrativeVerdict {
                    summary: "Sales fell".into(),
                    impact: Impact::Bearish,
                    reason: "weak demand".into(),
                },
                fields: FieldPresence {
                    summary: true,
                    impact: true,
                    reason: true,
                },
            }
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_uses_headline_only() {
        let mut extractor = MockContentExtractor::new();
        extractor.expect_fetch().returning(|url| {
            Err(PulseError::ExtractionFailed {
                url: url.to_string(),
                reason: "timeout".into(),
            })
        });

        let mut provider = provider_named();
        provider
            .expect_complete()
            .withf(|req| req.messages[0].text().contains(HEADLINE_ONLY_NOTE))
            .returning(|_| Ok(reply("SUMMARY: Only a headline")));

        let outcome = analyzer(extractor, provider)
            .analyze("ITC", "ITC demerger", "https://example.com/b")
            .await;

        assert!(!outcome.is_degraded());
        let NarrativeOutcome::Analyzed { verdict, fields } = outcome else {
            panic!("expected analyzed outcome");
        };
        assert_eq!(verdict.impact, Impact::Neutral);
        assert_eq!(verdict.reason, "No reason provided");
        assert!(!fields.all_present());
    }

    #[tokio::test]
    async fn test_generation_failure_degrades() {
        let mut extractor = MockContentExtractor::new();
        extractor.expect_fetch().returning(|_| Ok(String::new()));

        let mut provider = provider_named();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".into())));

        let outcome = analyzer(extractor, provider)
            .analyze("SBIN", "SBI rates", "https://example.com/c")
            .await;

        assert!(outcome.is_degraded());
        let verdict = outcome.verdict();
        assert_eq!(verdict.summary, DEGRADED_SUMMARY);
        assert_eq!(verdict.impact, Impact::Neutral);
        assert!(verdict.reason.contains("slow down"));
    }

    #[tokio::test]
    async fn test_empty_reply_degrades() {
        let mut extractor = MockContentExtractor::new();
        extractor.expect_fetch().returning(|_| Ok(String::new()));

        let mut provider = provider_named();
        provider.expect_complete().returning(|_| Ok(reply("  \n ")));

        let outcome = analyzer(extractor, provider)
            .analyze("WIPRO", "Wipro guidance", "https://example.com/d")
            .await;

        assert!(matches!(outcome, NarrativeOutcome::Degraded { .. }));
    }
}
