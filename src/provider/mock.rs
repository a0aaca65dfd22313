use async_trait::async_trait;
use futures_util::stream;

use crate::client::LLMClient;
use crate::config::MockLLMConfig;
use crate::error::LLMError;
use crate::stream::PartialMessageStream;
use crate::types::{Message, RequestOptions};

/// Client returning canned outputs, for exercising code written against [`LLMClient`]
/// without a backend.
#[derive(Debug, Clone)]
pub struct MockLLMClient {
    config: MockLLMConfig,
}

impl MockLLMClient {
    pub fn new(config: MockLLMConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn request_llm_message(
        &self,
        _messages: &[Message],
        _options: &RequestOptions,
    ) -> Result<String, LLMError> {
        Ok(self.config.response_message.clone())
    }

    async fn stream_llm_partial_messages(
        &self,
        _messages: &[Message],
        _options: &RequestOptions,
    ) -> Result<PartialMessageStream, LLMError> {
        let messages = self.config.stream_messages.clone();
        Ok(Box::pin(stream::iter(messages.into_iter().map(Ok))))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
