//! Command-line interface for stock-pulse
//!
//! # Usage
//!
//! ```bash
//! # Headline sentiment, JSON output
//! pulse fast "Tata Motors" --limit 5
//!
//! # LLM impact analysis, table output
//! export OPENAI_API_KEY=...
//! pulse deep RELIANCE --format table
//!
//! # Any OpenAI-compatible server, or another provider
//! export OPENAI_API_BASE="http://localhost:1234/v1"
//! export PULSE_PROVIDER=anthropic
//! ```

mod render;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pulse_llm::LLMProvider;
use pulse_llm::providers::{AnthropicProvider, GeminiProvider, OpenAIProvider, ProviderKind};
use pulse_news::{
    ArticleSource, CachedSource, DigestConfig, GoogleNewsSource, HtmlExtractor, Mode,
    NarrativeAnalyzer, NewsPipeline,
};
use std::env;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(version, about = "Scored news digests for Indian stocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score headlines with a sentiment lexicon
    Fast(RunArgs),
    /// Read each article and ask a model for its market impact
    Deep(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Ticker or company name, e.g. "Tata Motors"
    ticker: String,

    /// Number of articles (default 10 for fast, 3 for deep)
    #[arg(short, long, value_parser = parse_limit)]
    limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Table,
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Provider selection only matters for deep runs; fast runs ignore `PULSE_PROVIDER`.
fn resolve_provider(mode: Mode, name: Option<&str>) -> anyhow::Result<Option<ProviderKind>> {
    match (mode, name) {
        (Mode::Fast, _) => Ok(None),
        (Mode::Deep, Some(name)) if !name.trim().is_empty() => Ok(Some(name.parse()?)),
        (Mode::Deep, _) => Ok(Some(ProviderKind::OpenAI)),
    }
}

fn build_provider(kind: ProviderKind) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let provider: Arc<dyn LLMProvider> = match kind {
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::from_env()?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_env()?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::from_env()?),
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pulse_utils::init_tracing()?;

    let cli = Cli::parse();

    let (mode, args) = match cli.command {
        Command::Fast(args) => (Mode::Fast, args),
        Command::Deep(args) => (Mode::Deep, args),
    };

    let kind = resolve_provider(mode, env::var("PULSE_PROVIDER").ok().as_deref())?;

    let config = DigestConfig::builder()
        .model(kind.unwrap_or(ProviderKind::OpenAI).default_model())
        .with_env()?
        .build()
        .context("invalid digest configuration")?;
    debug!(?config, "Loaded configuration");

    let google = GoogleNewsSource::new(&config)?;
    let source = CachedSource::new(Arc::new(google), config.search_cache_ttl);
    let source: Arc<dyn ArticleSource> = Arc::new(source);

    let mut pipeline = NewsPipeline::new(config.clone(), source);
    if let Some(kind) = kind {
        info!(provider = ?kind, model = %config.model, "Using text generation");
        let analyzer = NarrativeAnalyzer::new(
            &config,
            Arc::new(HtmlExtractor::new(&config)?),
            build_provider(kind)?,
        )?;
        pipeline = pipeline.with_narrative(analyzer);
    }

    let digest = pipeline
        .run(&args.ticker, args.limit, mode)
        .await
        .with_context(|| format!("failed to build {mode} digest for '{}'", args.ticker.trim()))?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&digest.to_payload())?);
        }
        OutputFormat::Table => println!("{}", render::digest_table(&digest)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["pulse", "fast", "Tata Motors", "--limit", "5"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        let Command::Fast(args) = cli.command else {
            panic!("expected fast subcommand");
        };
        assert_eq!(args.ticker, "Tata Motors");
        assert_eq!(args.limit, Some(5));

        let cli = Cli::try_parse_from(["pulse", "deep", "INFY", "--format", "table"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(matches!(cli.command, Command::Deep(RunArgs { limit: None, .. })));
    }

    #[test]
    fn test_provider_resolved_only_for_deep_runs() {
        assert_eq!(resolve_provider(Mode::Fast, Some("llama")).unwrap(), None);
        assert_eq!(resolve_provider(Mode::Fast, None).unwrap(), None);

        assert!(resolve_provider(Mode::Deep, Some("llama")).is_err());
        assert_eq!(
            resolve_provider(Mode::Deep, Some("anthropic")).unwrap(),
            Some(ProviderKind::Anthropic)
        );
        assert_eq!(
            resolve_provider(Mode::Deep, None).unwrap(),
            Some(ProviderKind::OpenAI)
        );
    }

    #[test]
    fn test_rejects_zero_limit_and_missing_ticker() {
        assert!(Cli::try_parse_from(["pulse", "fast", "TCS", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["pulse", "fast", "TCS", "--limit", "-2"]).is_err());
        assert!(Cli::try_parse_from(["pulse", "deep"]).is_err());
    }
}
