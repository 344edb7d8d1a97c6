//! End-to-end digest runs against in-process fakes

use async_trait::async_trait;
use pulse_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use pulse_news::{
    ArticleSource, CachedSource, CandidateArticle, ContentExtractor, DigestConfig, Impact, Mode,
    NarrativeAnalyzer, NewsPipeline, PulseError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct FixedSource {
    articles: Vec<CandidateArticle>,
    calls: AtomicUsize,
}

impl FixedSource {
    fn new(titles: &[&str]) -> Self {
        let articles = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                CandidateArticle::new(*t, format!("https://news.example/{i}"), "Tue, 07 Oct 2025")
            })
            .collect();
        Self {
            articles,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ArticleSource for FixedSource {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> pulse_news::Result<Vec<CandidateArticle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.articles.iter().take(max_results).cloned().collect())
    }
}

const BODY_SENTENCE: &str = "Quarterly revenue grew well ahead of analyst expectations. ";

/// Returns a long body for the first article only
struct FirstOnlyExtractor;

#[async_trait]
impl ContentExtractor for FirstOnlyExtractor {
    async fn fetch(&self, url: &str) -> pulse_news::Result<String> {
        if url.ends_with("/0") {
            Ok(BODY_SENTENCE.repeat(200))
        } else {
            Err(PulseError::ExtractionFailed {
                url: url.to_string(),
                reason: "paywall".to_string(),
            })
        }
    }
}

/// Fails on "outage" headlines and answers briefly when there is no body
struct KeywordProvider {
    prompts: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl LLMProvider for KeywordProvider {
    async fn complete(&self, request: CompletionRequest) -> pulse_llm::Result<CompletionResponse> {
        let prompt = request.messages[0].text().to_string();
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.clone());
        }

        if prompt.contains("outage") {
            return Err(LLMError::RequestFailed("HTTP 500: upstream".to_string()));
        }

        let text = if prompt.contains("headline only") {
            "SUMMARY: Headline only"
        } else {
            "REASON: costs rising\nIMPACT: Bearish\nSUMMARY: Revenue grew but margins shrank"
        };

        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[tokio::test]
async fn fast_digest_end_to_end() {
    let source = Arc::new(FixedSource::new(&[
        "Infosys shares rally after excellent quarterly results",
        "Infosys faces lawsuit over terrible data breach",
        "Infosys to announce results on Thursday",
    ]));

    let pipeline = NewsPipeline::new(DigestConfig::default(), source);
    let digest = pipeline.run("Infosys", None, Mode::Fast).await.unwrap();
    let payload = digest.to_fast_payload();

    assert_eq!(payload.stock, "Infosys");
    assert_eq!(payload.news_count, 3);
    assert_eq!(payload.articles[0].sentiment, "Positive");
    assert_eq!(payload.articles[1].sentiment, "Negative");
    for article in &payload.articles {
        assert!((-1.0..=1.0).contains(&article.sentiment_score));
        assert_eq!(article.published_at, "Tue, 07 Oct 2025");
    }
    assert!(
        ["Bullish (Positive)", "Bearish (Negative)", "Neutral"]
            .contains(&payload.overall_sentiment.as_str())
    );
}

#[tokio::test]
async fn deep_digest_end_to_end() {
    let config = DigestConfig::builder().content_cap(500).build().unwrap();
    let source = Arc::new(FixedSource::new(&[
        "Wipro revenue beats estimates",
        "Wipro hit by cloud outage",
        "Wipro names new CFO",
    ]));
    let provider = Arc::new(KeywordProvider {
        prompts: std::sync::Mutex::new(Vec::new()),
    });

    let analyzer = NarrativeAnalyzer::new(
        &config,
        Arc::new(FirstOnlyExtractor),
        Arc::clone(&provider) as Arc<dyn LLMProvider>,
    )
    .unwrap();
    let pipeline = NewsPipeline::new(config, source).with_narrative(analyzer);

    let digest = pipeline.run("Wipro", None, Mode::Deep).await.unwrap();
    let payload = digest.to_deep_payload();

    assert_eq!(payload.analysis_engine, "gpt-4o-mini");
    assert_eq!(payload.articles.len(), 3);

    assert_eq!(payload.articles[0].market_impact, "Bearish");
    assert_eq!(payload.articles[0].ai_summary, "Revenue grew but margins shrank");
    assert!(!payload.articles[0].degraded);

    assert!(payload.articles[1].degraded);
    assert_eq!(payload.articles[1].ai_summary, "Error analyzing.");
    assert!(payload.articles[1].impact_reason.contains("upstream"));

    assert_eq!(payload.articles[2].ai_summary, "Headline only");
    assert_eq!(payload.articles[2].impact_reason, "No reason provided");
    assert!(!payload.articles[2].degraded);

    assert_eq!(digest.impact_majority(), Impact::Neutral);

    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 3);
    // 500 chars of a 59-char sentence
    let repeats = prompts[0].matches("Quarterly revenue").count();
    assert!((8..=9).contains(&repeats), "{repeats}");
    assert!(prompts[0].chars().count() < 500 + 600);
}

#[tokio::test]
async fn cached_source_serves_repeat_runs() {
    let fixed = Arc::new(FixedSource::new(&["TCS wins large deal"]));
    let cached = CachedSource::new(
        Arc::clone(&fixed) as Arc<dyn ArticleSource>,
        Duration::from_secs(300),
    );
    let pipeline = NewsPipeline::new(DigestConfig::default(), Arc::new(cached));

    let first = pipeline.run("TCS", Some(1), Mode::Fast).await.unwrap();
    let second = pipeline.run("TCS", Some(1), Mode::Fast).await.unwrap();

    assert_eq!(fixed.calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.articles, second.articles);
}
