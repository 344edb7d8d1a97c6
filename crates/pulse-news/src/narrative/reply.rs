//! Lenient decoder for the three-line analyst reply

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SUMMARY: &str = "No summary";
pub const DEFAULT_REASON: &str = "No reason provided";

const SUMMARY_MARKER: &str = "SUMMARY";
const IMPACT_MARKER: &str = "IMPACT";
const REASON_MARKER: &str = "REASON";

/// Expected effect of a news item on the stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Impact {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }

    /// Case-insensitive match once surrounding punctuation and markdown
    /// emphasis are stripped, so `**Bullish**` and `bullish.` both count.
    pub fn parse_label(text: &str) -> Option<Self> {
        let word = text.trim_matches(|c: char| !c.is_alphanumeric());
        [Self::Bullish, Self::Bearish, Self::Neutral]
            .into_iter()
            .find(|impact| impact.as_str().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reply field together with whether the model actually supplied it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedField<T> {
    Present(T),
    Defaulted(T),
}

impl<T> ParsedField<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Present(v) | Self::Defaulted(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Present(v) | Self::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub summary: ParsedField<String>,
    pub impact: ParsedField<Impact>,
    pub reason: ParsedField<String>,
}

impl ParsedReply {
    /// Number of fields that fell back to their default
    pub fn defaulted_count(&self) -> usize {
        [
            self.summary.is_defaulted(),
            self.impact.is_defaulted(),
            self.reason.is_defaulted(),
        ]
        .into_iter()
        .filter(|d| *d)
        .count()
    }
}

/// Parse a reply of `SUMMARY: ...`, `IMPACT: ...`, `REASON: ...` lines.
///
/// Each marker is matched case-sensitively anywhere in a line; the first
/// matching line wins and its value is whatever follows the first `": "`.
/// Lines may appear in any order.
pub fn parse_reply(text: &str) -> ParsedReply {
    let summary = match find_field(text, SUMMARY_MARKER) {
        Some(value) => ParsedField::Present(value.to_string()),
        None => ParsedField::Defaulted(DEFAULT_SUMMARY.to_string()),
    };

    let impact = match find_field(text, IMPACT_MARKER).and_then(Impact::parse_label) {
        Some(impact) => ParsedField::Present(impact),
        None => ParsedField::Defaulted(Impact::Neutral),
    };

    let reason = match find_field(text, REASON_MARKER) {
        Some(value) => ParsedField::Present(value.to_string()),
        None => ParsedField::Defaulted(DEFAULT_REASON.to_string()),
    };

    ParsedReply {
        summary,
        impact,
        reason,
    }
}

fn find_field<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let line = text.lines().find(|line| line.contains(marker))?;
    line.split_once(": ").map(|(_, rest)| rest.trim())
}
