//! Shared fakes for unit tests

use async_trait::async_trait;
use mockall::mock;
use pulse_llm::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
};

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> pulse_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

pub fn reply(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

/// Provider whose behaviour is driven by words in the headline:
/// `fail` returns an error, `boom` panics and `slow` delays the reply.
/// Otherwise it echoes the headline as a bullish summary.
pub struct ScriptedProvider;

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> pulse_llm::Result<CompletionResponse> {
        let prompt = request.messages.first().map(Message::text).unwrap_or_default();
        let headline = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Headline: "))
            .unwrap_or_default()
            .to_string();

        if headline.contains("boom") {
            panic!("scripted panic");
        }
        if headline.contains("fail") {
            return Err(pulse_llm::LLMError::RequestFailed("scripted failure".into()));
        }
        if headline.contains("slow") {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        Ok(reply(&format!(
            "SUMMARY: {headline}\nIMPACT: Bullish\nREASON: scripted"
        )))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
