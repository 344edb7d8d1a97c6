//! Human-readable table output

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use pulse_news::{DigestResult, Mode, Scoring};
use std::fmt::Write;

/// Render a digest as a header line plus one table row per article
pub fn digest_table(digest: &DigestResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({} mode) at {}",
        digest.ticker,
        digest.mode,
        digest.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match digest.mode {
        Mode::Fast => {
            if let Some(label) = digest.overall_label {
                let _ = writeln!(out, "Overall: {label}");
            }
        }
        Mode::Deep => {
            let _ = writeln!(
                out,
                "Engine: {}  Majority impact: {}",
                digest.analysis_engine.as_deref().unwrap_or("-"),
                digest.impact_majority()
            );
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    match digest.mode {
        Mode::Fast => table.set_header(vec!["#", "Headline", "Sentiment", "Score", "Published"]),
        Mode::Deep => table.set_header(vec!["#", "Headline", "Impact", "Summary", "Reason"]),
    };

    for (i, analyzed) in digest.articles.iter().enumerate() {
        let title = analyzed.article.title.clone();
        let row = match &analyzed.scoring {
            Scoring::Sentiment(score) => vec![
                (i + 1).to_string(),
                title,
                score.label.to_string(),
                format!("{:+.3}", score.compound),
                analyzed.article.published_at.clone(),
            ],
            Scoring::Narrative(outcome) => {
                let verdict = outcome.verdict();
                let impact = if outcome.is_degraded() {
                    format!("{} (degraded)", verdict.impact)
                } else {
                    verdict.impact.to_string()
                };
                vec![
                    (i + 1).to_string(),
                    title,
                    impact,
                    verdict.summary.clone(),
                    verdict.reason.clone(),
                ]
            }
        };
        table.add_row(row);
    }

    if digest.articles.is_empty() {
        let _ = writeln!(out, "No articles found.");
    } else {
        let _ = write!(out, "{table}");
    }
    out
}
