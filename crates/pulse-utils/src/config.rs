//! Process-level configuration

use serde::{Deserialize, Serialize};

const DEFAULT_LOG_FILTER: &str = "warn,pulse_news=info,pulse_cli=info";

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "stock-pulse".to_string(),
            environment: "development".to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Overlay `PULSE_ENV`, `PULSE_LOG` and `PULSE_LOG_JSON` on the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let json = lookup("PULSE_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            app_name: defaults.app_name,
            environment: lookup("PULSE_ENV").unwrap_or(defaults.environment),
            log_filter: lookup("PULSE_LOG").unwrap_or(defaults.log_filter),
            log_format: if json { LogFormat::Json } else { LogFormat::Text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "stock-pulse");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.log_filter.contains("pulse_news=info"));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            ("PULSE_ENV", "production"),
            ("PULSE_LOG", "debug"),
            ("PULSE_LOG_JSON", "TRUE"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| vars.get(k).map(ToString::to_string));
        assert_eq!(config.environment, "production");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_serde() {
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), "\"json\"");
    }
}
