//! LLM-backed impact analysis of a single article
//!
//! The analyzer downloads the article body, renders a constrained prompt,
//! sends it to an [`LLMProvider`](pulse_llm::LLMProvider) and decodes the
//! three-line reply leniently. It never fails: generation problems come
//! back as [`NarrativeOutcome::Degraded`].

pub mod analyzer;
pub mod prompt;
pub mod reply;

pub use analyzer::{FieldPresence, NarrativeAnalyzer, NarrativeOutcome, NarrativeVerdict};
pub use prompt::{HEADLINE_ONLY_NOTE, ImpactPrompt};
pub use reply::{Impact, ParsedField, ParsedReply, parse_reply};
