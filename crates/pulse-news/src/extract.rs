//! Article body extraction

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, instrument};
use url::Url;

use crate::config::DigestConfig;
use crate::error::{PulseError, Result};

#[allow(clippy::unwrap_used)]
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Downloads a page and returns its main body text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and extract readable text. May return very little text
    /// for paywalled or script-rendered pages.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP + HTML paragraph extractor
pub struct HtmlExtractor {
    client: Client,
}

impl HtmlExtractor {
    /// Build an extractor using the configured timeout and user agent
    pub fn new(config: &DigestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.extraction_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let failed = |reason: String| PulseError::ExtractionFailed {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| failed(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(failed(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let html = response.text().await.map_err(|e| failed(e.to_string()))?;
        let text = extract_main_text(&html);
        debug!(chars = text.chars().count(), "Extracted article body");
        Ok(text)
    }
}

/// Pull paragraph text out of the most specific content root available:
/// `<article>`, then `<main>`, then `<body>`.
pub fn extract_main_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = ["article", "main", "body"].iter().find_map(|tag| {
        Selector::parse(tag)
            .ok()
            .and_then(|sel| document.select(&sel).next())
    });

    let (Some(root), Ok(paragraphs)) = (root, Selector::parse("p")) else {
        return String::new();
    };

    root.select(&paragraphs)
        .map(text_content)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_content(elem: ElementRef<'_>) -> String {
    let raw = elem.text().collect::<String>();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};
    use std::time::Duration;

    const PAGE: &str = r#"<html><head><title>t</title><script>var x = 1;</script></head>
<body>
  <nav><p>Home | Markets | Login</p></nav>
  <article>
    <h1>Tata Motors shares jump</h1>
    <p>Shares of Tata Motors rose
       4% on Monday.</p>
    <p>   </p>
    <p>JLR wholesales beat <b>estimates</b>.</p>
  </article>
  <footer><p>Copyright</p></footer>
</body></html>"#;

    #[test]
    fn test_prefers_article_paragraphs() {
        let text = extract_main_text(PAGE);
        assert_eq!(
            text,
            "Shares of Tata Motors rose 4% on Monday.\nJLR wholesales beat estimates."
        );
    }

    #[test]
    fn test_falls_back_to_main_then_body() {
        let main = "<html><body><p>outside</p><main><p>inside main</p></main></body></html>";
        assert_eq!(extract_main_text(main), "inside main");

        let body = "<html><body><div><p>one</p><p>two</p></div></body></html>";
        assert_eq!(extract_main_text(body), "one\ntwo");
    }

    #[test]
    fn test_no_paragraphs_yields_empty() {
        assert_eq!(extract_main_text("<html><body><div>just a div</div></body></html>"), "");
        assert_eq!(extract_main_text(""), "");
    }

    #[tokio::test]
    async fn test_fetch_extracts_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/news/tata")
                    .header_exists("user-agent");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body(PAGE);
            })
            .await;

        let extractor = HtmlExtractor::new(&DigestConfig::default()).unwrap();
        let text = extractor.fetch(&server.url("/news/tata")).await.unwrap();

        mock.assert_async().await;
        assert!(text.starts_with("Shares of Tata Motors rose 4%"));
    }

    #[tokio::test]
    async fn test_fetch_reports_http_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/paywalled");
                then.status(403);
            })
            .await;

        let extractor = HtmlExtractor::new(&DigestConfig::default()).unwrap();
        let err = extractor.fetch(&server.url("/paywalled")).await.unwrap_err();
        assert!(matches!(err, PulseError::ExtractionFailed { reason, .. } if reason.contains("403")));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_secs(2)).body(PAGE);
            })
            .await;

        let config = DigestConfig::builder()
            .extraction_timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let extractor = HtmlExtractor::new(&config).unwrap();

        assert!(extractor.fetch(&server.url("/slow")).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let extractor = HtmlExtractor::new(&DigestConfig::default()).unwrap();
        assert!(extractor.fetch("file:///etc/passwd").await.is_err());
        assert!(extractor.fetch("not a url").await.is_err());
    }
}
