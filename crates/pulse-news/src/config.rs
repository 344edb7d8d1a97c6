//! Configuration for news digest operations

use crate::error::{PulseError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the news pipeline and its collaborators
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Appended to the ticker to build the search query
    pub query_suffix: String,

    /// Search language (`hl`)
    pub language: String,

    /// Search country (`gl`)
    pub country: String,

    /// Recency window understood by the search backend, e.g. `2d`
    pub recency_window: String,

    /// Result limit used by fast mode when the caller gives none
    pub default_fast_limit: usize,

    /// Result limit used by deep mode when the caller gives none
    pub default_deep_limit: usize,

    /// Maximum body characters passed into the narrative prompt
    pub content_cap: usize,

    /// Bodies shorter than this are treated as not extracted
    pub min_content_len: usize,

    /// Timeout for downloading a single article page
    pub extraction_timeout: Duration,

    /// User agent sent when downloading article pages
    pub user_agent: String,

    /// Upper bound on articles processed at once
    pub max_concurrency: usize,

    /// How long search results are reused
    pub search_cache_ttl: Duration,

    /// Search requests allowed per minute
    pub source_rate_limit: u32,

    /// Model identifier sent to the text-generation provider
    pub model: String,

    /// Token budget for one narrative reply
    pub max_tokens: usize,

    /// Sampling temperature for narrative replies
    pub temperature: f32,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            query_suffix: "stock news India".to_string(),
            language: "en".to_string(),
            country: "IN".to_string(),
            recency_window: "2d".to_string(),
            default_fast_limit: 10,
            default_deep_limit: 3,
            content_cap: 4000,
            min_content_len: 50,
            extraction_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: 4,
            search_cache_ttl: Duration::from_secs(300), // 5 minutes
            source_rate_limit: 30,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            temperature: 0.2,
        }
    }
}

impl DigestConfig {
    /// Create a new configuration builder
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder::default()
    }

    /// Defaults overlaid with `PULSE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Build the search query for a ticker
    pub fn search_query(&self, ticker: &str) -> String {
        let ticker = ticker.trim();
        if self.query_suffix.is_empty() {
            ticker.to_string()
        } else {
            format!("{ticker} {}", self.query_suffix)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.content_cap == 0 {
            return Err(PulseError::ConfigError(
                "content_cap must be greater than 0".to_string(),
            ));
        }

        if self.min_content_len > self.content_cap {
            return Err(PulseError::ConfigError(format!(
                "min_content_len ({}) cannot exceed content_cap ({})",
                self.min_content_len, self.content_cap
            )));
        }

        if self.max_concurrency == 0 {
            return Err(PulseError::ConfigError(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.source_rate_limit == 0 {
            return Err(PulseError::ConfigError(
                "source_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.default_fast_limit == 0 || self.default_deep_limit == 0 {
            return Err(PulseError::ConfigError(
                "default limits must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PulseError::ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        if self.model.trim().is_empty() {
            return Err(PulseError::ConfigError("model must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for DigestConfig
#[derive(Debug, Default)]
pub struct DigestConfigBuilder {
    query_suffix: Option<String>,
    language: Option<String>,
    country: Option<String>,
    recency_window: Option<String>,
    default_fast_limit: Option<usize>,
    default_deep_limit: Option<usize>,
    content_cap: Option<usize>,
    min_content_len: Option<usize>,
    extraction_timeout: Option<Duration>,
    user_agent: Option<String>,
    max_concurrency: Option<usize>,
    search_cache_ttl: Option<Duration>,
    source_rate_limit: Option<u32>,
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl DigestConfigBuilder {
    /// Set the query suffix appended to tickers
    pub fn query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query_suffix = Some(suffix.into());
        self
    }

    /// Set the search language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the search country
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the recency window
    pub fn recency_window(mut self, window: impl Into<String>) -> Self {
        self.recency_window = Some(window.into());
        self
    }

    /// Set the default fast-mode limit
    pub fn default_fast_limit(mut self, limit: usize) -> Self {
        self.default_fast_limit = Some(limit);
        self
    }

    /// Set the default deep-mode limit
    pub fn default_deep_limit(mut self, limit: usize) -> Self {
        self.default_deep_limit = Some(limit);
        self
    }

    /// Set the body character cap
    pub fn content_cap(mut self, cap: usize) -> Self {
        self.content_cap = Some(cap);
        self
    }

    /// Set the minimum usable body length
    pub fn min_content_len(mut self, len: usize) -> Self {
        self.min_content_len = Some(len);
        self
    }

    /// Set the page download timeout
    pub fn extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = Some(timeout);
        self
    }

    /// Set the user agent for page downloads
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-run concurrency bound
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = Some(n);
        self
    }

    /// Set the search cache TTL
    pub fn search_cache_ttl(mut self, ttl: Duration) -> Self {
        self.search_cache_ttl = Some(ttl);
        self
    }

    /// Set the search rate limit (requests per minute)
    pub fn source_rate_limit(mut self, per_minute: u32) -> Self {
        self.source_rate_limit = Some(per_minute);
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the reply token budget
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Apply `PULSE_*` environment variables on top of what is already set
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let string = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str| parse_var::<u64>(key, string(key)).map(|v| v.map(Duration::from_secs));

        if let Some(v) = string("PULSE_QUERY_SUFFIX") {
            self.query_suffix = Some(v);
        }
        if let Some(v) = string("PULSE_LANGUAGE") {
            self.language = Some(v);
        }
        if let Some(v) = string("PULSE_COUNTRY") {
            self.country = Some(v);
        }
        if let Some(v) = string("PULSE_RECENCY") {
            self.recency_window = Some(v);
        }
        if let Some(v) = string("PULSE_USER_AGENT") {
            self.user_agent = Some(v);
        }
        if let Some(v) = string("PULSE_MODEL") {
            self.model = Some(v);
        }
        self.content_cap = parse_var("PULSE_CONTENT_CAP", string("PULSE_CONTENT_CAP"))?.or(self.content_cap);
        self.min_content_len =
            parse_var("PULSE_MIN_CONTENT_LEN", string("PULSE_MIN_CONTENT_LEN"))?.or(self.min_content_len);
        self.max_concurrency =
            parse_var("PULSE_CONCURRENCY", string("PULSE_CONCURRENCY"))?.or(self.max_concurrency);
        self.source_rate_limit =
            parse_var("PULSE_RATE_LIMIT", string("PULSE_RATE_LIMIT"))?.or(self.source_rate_limit);
        self.max_tokens = parse_var("PULSE_MAX_TOKENS", string("PULSE_MAX_TOKENS"))?.or(self.max_tokens);
        self.temperature =
            parse_var("PULSE_TEMPERATURE", string("PULSE_TEMPERATURE"))?.or(self.temperature);
        self.extraction_timeout = secs("PULSE_EXTRACT_TIMEOUT_SECS")?.or(self.extraction_timeout);
        self.search_cache_ttl = secs("PULSE_CACHE_TTL_SECS")?.or(self.search_cache_ttl);

        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<DigestConfig> {
        let defaults = DigestConfig::default();

        let config = DigestConfig {
            query_suffix: self.query_suffix.unwrap_or(defaults.query_suffix),
            language: self.language.unwrap_or(defaults.language),
            country: self.country.unwrap_or(defaults.country),
            recency_window: self.recency_window.unwrap_or(defaults.recency_window),
            default_fast_limit: self.default_fast_limit.unwrap_or(defaults.default_fast_limit),
            default_deep_limit: self.default_deep_limit.unwrap_or(defaults.default_deep_limit),
            content_cap: self.content_cap.unwrap_or(defaults.content_cap),
            min_content_len: self.min_content_len.unwrap_or(defaults.min_content_len),
            extraction_timeout: self.extraction_timeout.unwrap_or(defaults.extraction_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            search_cache_ttl: self.search_cache_ttl.unwrap_or(defaults.search_cache_ttl),
            source_rate_limit: self.source_rate_limit.unwrap_or(defaults.source_rate_limit),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                PulseError::ConfigError(format!("{key} has an invalid value: '{raw}'"))
            })
        })
        .transpose()
}
