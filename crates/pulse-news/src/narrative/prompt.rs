//! MiniJinja prompt for the impact analysis request

use minijinja::{Environment, context};

use crate::error::Result;

/// Substituted for the article body when nothing usable was extracted
pub const HEADLINE_ONLY_NOTE: &str =
    "Content could not be extracted. Analyze based on headline only.";

const PERSONA_NAME: &str = "persona";
const TEMPLATE_NAME: &str = "impact";

const PERSONA_TEMPLATE: &str = "\
You are a senior financial analyst covering {{ ticker }} on Indian exchanges. \
Judge news strictly by its likely effect on the stock price and never add \
anything beyond the requested lines.";

const IMPACT_TEMPLATE: &str = "\
Read the following news article and answer in exactly three lines.

Headline: {{ title }}
Article:
{{ body }}

Respond in this format:
SUMMARY: <one or two sentence summary>
IMPACT: <Bullish, Bearish or Neutral>
REASON: <one short sentence explaining the impact on {{ ticker }}>";

/// Compiled impact prompt
pub struct ImpactPrompt {
    env: Environment<'static>,
    content_cap: usize,
    min_content_len: usize,
}

impl ImpactPrompt {
    pub fn new(content_cap: usize, min_content_len: usize) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PERSONA_NAME, PERSONA_TEMPLATE)?;
        env.add_template(TEMPLATE_NAME, IMPACT_TEMPLATE)?;
        Ok(Self {
            env,
            content_cap,
            min_content_len,
        })
    }

    /// Trim extracted text to the cap, or fall back to the headline-only note
    /// when there is too little of it.
    pub fn prepare_body(&self, extracted: Option<&str>) -> String {
        let Some(text) = extracted.map(str::trim) else {
            return HEADLINE_ONLY_NOTE.to_string();
        };

        if text.chars().count() < self.min_content_len {
            return HEADLINE_ONLY_NOTE.to_string();
        }

        text.chars().take(self.content_cap).collect()
    }

    /// System persona for the analysis request
    pub fn render_system(&self, ticker: &str) -> Result<String> {
        let template = self.env.get_template(PERSONA_NAME)?;
        Ok(template.render(context! { ticker })?)
    }

    /// User message carrying the article
    pub fn render(&self, ticker: &str, title: &str, body: &str) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context! { ticker, title, body })?)
    }
}
