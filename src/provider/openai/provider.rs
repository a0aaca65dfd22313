use crate::config::OpenAiConfig;
use crate::error::LLMError;
use crate::http::HttpRequest;
use crate::provider::BackendAdapter;
use crate::stream::{StreamFraming, StreamUpdate};
use crate::types::{Message, RequestOptions};

use super::error::parse_openai_error;
use super::request::build_openai_body;
use super::response::{first_choice_content, first_choice_delta};

/// Adapter for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    config: OpenAiConfig,
}

impl OpenAiAdapter {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

impl BackendAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn build_request(
        &self,
        messages: &[Message],
        options: &RequestOptions,
        stream: bool,
    ) -> Result<HttpRequest, LLMError> {
        let body = build_openai_body(
            &self.config.model_name,
            messages,
            options,
            stream,
            self.config.force_user_assistant_message_alternation,
        );
        let mut request = HttpRequest::post_serialized(&self.config.url, &body)?
            .with_timeout(self.config.timeout());
        if let Some(token) = &self.config.auth_token {
            request = request.with_header("Authorization", format!("Bearer {token}"));
        }
        if stream {
            request = request.with_header("Accept", "text/event-stream");
        }
        Ok(request)
    }

    fn parse_complete_response(&self, body: &[u8]) -> Result<String, LLMError> {
        first_choice_content(self.name(), body)
    }

    fn parse_stream_chunk(&self, line: &[u8]) -> Result<StreamUpdate, LLMError> {
        first_choice_delta(self.name(), line).map(StreamUpdate::Delta)
    }

    fn classify_error(&self, status: u16, body: String) -> LLMError {
        parse_openai_error(status, body)
    }

    fn stream_framing(&self) -> StreamFraming {
        StreamFraming::Sse
    }
}
